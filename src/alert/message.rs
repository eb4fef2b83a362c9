//! Alert message composition.

use chrono::{DateTime, Utc};

use crate::alert::Message;
use crate::target::{TargetSettings, TargetState, Transition};

const TIMESTAMP_FORMAT: &str = "%b %d, %Y %H:%M:%S UTC";

/// Build the alert for a target that just flipped.
///
/// The sender is the target's `from_email`, falling back to `default_from`.
pub fn compose_alert(
    settings: &TargetSettings,
    state: &TargetState,
    transition: Transition,
    default_from: &str,
    now: DateTime<Utc>,
) -> Message {
    let (subject, summary) = match transition {
        Transition::Recovered => (
            format!("[url-sentry] site online: {}", settings.name),
            format!("URL is back online: {}", settings.url),
        ),
        Transition::Failed => (
            format!("[url-sentry] site offline: {}", settings.name),
            format!(
                "Received an unexpected return code when requesting URL {}",
                settings.url
            ),
        ),
    };

    let body = format!(
        "\nTimestamp:  {}\nName:       {}\nURL:        {}\nStatusCode: {}\n{}\n{}",
        now.format(TIMESTAMP_FORMAT),
        settings.name,
        settings.url,
        state.last_return_code,
        "-".repeat(59),
        summary,
    );

    Message {
        subject,
        to: settings.alert_email_list.clone(),
        from: settings
            .from_email
            .clone()
            .unwrap_or_else(|| default_from.to_string()),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    fn settings() -> TargetSettings {
        TargetSettings {
            name: "shop".into(),
            url: "https://shop.example.com".into(),
            check_interval: "1m".into(),
            interval: Duration::from_secs(60),
            follow_redirects: true,
            return_codes: [200].into_iter().collect(),
            from_email: None,
            alert_email_list: vec!["ops@example.com".into()],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_offline_message() {
        let state = TargetState {
            last_return_code: 503,
            current_state: false,
        };
        let msg = compose_alert(&settings(), &state, Transition::Failed, "sentry@localhost", now());

        assert_eq!(msg.subject, "[url-sentry] site offline: shop");
        assert_eq!(msg.to, vec!["ops@example.com"]);
        assert_eq!(msg.from, "sentry@localhost");
        assert!(msg.body.contains("Timestamp:  Mar 05, 2024 14:07:09 UTC"));
        assert!(msg.body.contains("Name:       shop"));
        assert!(msg.body.contains("URL:        https://shop.example.com"));
        assert!(msg.body.contains("StatusCode: 503"));
        assert!(msg
            .body
            .ends_with("Received an unexpected return code when requesting URL https://shop.example.com"));
    }

    #[test]
    fn test_online_message_uses_target_sender() {
        let mut target = settings();
        target.from_email = Some("shop-alerts@example.com".into());
        let state = TargetState {
            last_return_code: 200,
            current_state: true,
        };
        let msg = compose_alert(&target, &state, Transition::Recovered, "sentry@localhost", now());

        assert_eq!(msg.subject, "[url-sentry] site online: shop");
        assert_eq!(msg.from, "shop-alerts@example.com");
        assert!(msg.body.ends_with("URL is back online: https://shop.example.com"));
    }

    #[test]
    fn test_no_recipients_still_composed() {
        let mut target = settings();
        target.alert_email_list.clear();
        let msg = compose_alert(&target, &TargetState::default(), Transition::Failed, "a@b.c", now());
        assert!(msg.to.is_empty());
        assert!(!msg.body.is_empty());
    }
}
