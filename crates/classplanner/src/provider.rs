//! Course-data provider: where raw section feeds come from.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

use crate::config::ProviderConfig;
use crate::error::{Result, ScheduleError};
use crate::types::CourseDetails;

/// Source of section feeds for a term, subject and course.
#[async_trait]
pub trait CourseProvider: Send + Sync {
    async fn get_course_details(
        &self,
        term: &str,
        subject: &str,
        course: &str,
    ) -> Result<CourseDetails>;
}

/// Fetches course details as JSON over HTTP.
///
/// Issues `GET {base_url}?term=..&subject=..&course=..` and expects a body of
/// the shape of [`CourseDetails`].
pub struct HttpCourseProvider {
    client: Client,
    base_url: Url,
}

impl HttpCourseProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScheduleError::Provider {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    fn course_url(&self, term: &str, subject: &str, course: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("term", term)
            .append_pair("subject", subject)
            .append_pair("course", course);
        url
    }
}

#[async_trait]
impl CourseProvider for HttpCourseProvider {
    async fn get_course_details(
        &self,
        term: &str,
        subject: &str,
        course: &str,
    ) -> Result<CourseDetails> {
        let url = self.course_url(term, subject, course);
        info!(url = %url, "Requesting course details");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Course details request failed");
            return Err(ScheduleError::Provider {
                message: format!(
                    "Course details request failed with status {}: {}",
                    status, error_text
                ),
            });
        }

        let text = response.text().await?;
        let details: CourseDetails = serde_json::from_str(&text)?;

        info!(
            subject = %details.subject_code,
            course = %details.course_number,
            sections = details.sections.len(),
            "Received course details"
        );

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    const COURSE_BODY: &str = r#"{
        "subject_code": "CS",
        "course_number": "0445",
        "sections": [
            {"section_type": "Lecture",
             "meetings": [{"days": "MoWe", "start_time": "10.00", "end_time": "11.15"}]}
        ]
    }"#;

    /// Serves a small course feed on a random local port and returns its root URL.
    async fn spawn_feed() -> String {
        let app = Router::new()
            .route("/course", get(|| async { COURSE_BODY }))
            .route(
                "/unavailable",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route("/garbage", get(|| async { "<html>not json</html>" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(base_url: String) -> HttpCourseProvider {
        HttpCourseProvider::new(&ProviderConfig {
            base_url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_course_url_query() {
        let provider = HttpCourseProvider::new(&ProviderConfig {
            base_url: "http://localhost:9000/api/course".to_string(),
            timeout_secs: 5,
        })
        .unwrap();

        let url = provider.course_url("2251", "CS", "0445");
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/api/course?term=2251&subject=CS&course=0445"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpCourseProvider::new(&ProviderConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(ScheduleError::Config { .. })));
    }

    #[test]
    fn test_course_details_shape() {
        let body = r#"{
            "subject_code": "CS",
            "course_number": "0445",
            "sections": [
                {"section_type": "Lecture",
                 "meetings": [{"days": "MoWe", "start_time": "10.00", "end_time": "11.15"}]},
                {"section_type": "Recitation",
                 "meetings": [{"days": "Fr", "start_time": "12.00", "end_time": "12.50"}]}
            ]
        }"#;
        let details: CourseDetails = serde_json::from_str(body).unwrap();
        assert_eq!(details.sections.len(), 2);
        assert_eq!(details.sections[1].meetings[0].days, "Fr");
    }

    #[tokio::test]
    async fn test_fetches_course_details() {
        let root = spawn_feed().await;
        let details = provider(format!("{}/course", root))
            .get_course_details("2251", "CS", "0445")
            .await
            .unwrap();
        assert_eq!(details.course_number, "0445");
        assert_eq!(details.sections[0].meetings[0].days, "MoWe");
    }

    #[tokio::test]
    async fn test_error_status_is_provider_error() {
        let root = spawn_feed().await;
        let err = provider(format!("{}/unavailable", root))
            .get_course_details("2251", "CS", "0445")
            .await
            .unwrap_err();
        match err {
            ScheduleError::Provider { message } => {
                assert!(message.contains("503"));
                assert!(message.contains("maintenance"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_provider_error() {
        let root = spawn_feed().await;
        let err = provider(format!("{}/garbage", root))
            .get_course_details("2251", "CS", "0445")
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Provider { .. }));
    }
}
