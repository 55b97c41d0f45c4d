//! Due-subscription notification job
//!
//! Daily pass that classifies every non-auto-renewing subscription due
//! today or tomorrow, groups the rows by owner and fans one notification
//! per (subscription, endpoint) pair out to each user's registered push
//! endpoints. Delivery is best effort: every attempt is accounted for,
//! none aborts the rest.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tokio::time;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::send_push,
    model::{DueSubscription, PushSubscription},
    types::{NotificationData, NotificationPayload},
};

pub const ICON_FALLBACK: &str = "/icons/icon-192x192.png";

const TAG_PREFIX: &str = "subscription-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    DueToday,
    DueTomorrow,
    NotDue,
}

/// Calendar-day classification. Both sides are plain dates, so the
/// comparison is an integer day difference with no time-of-day involved.
/// A date in the past is NotDue: there is no catch-up notification.
pub fn classify(next_billing_date: NaiveDate, today: NaiveDate) -> DueStatus {
    match (next_billing_date - today).num_days() {
        0 => DueStatus::DueToday,
        1 => DueStatus::DueTomorrow,
        _ => DueStatus::NotDue,
    }
}

pub fn format_amount(price: &BigDecimal) -> String {
    price.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

pub fn build_payload(
    subscription: &DueSubscription,
    status: DueStatus,
) -> NotificationPayload {
    let title = match status {
        DueStatus::DueTomorrow => {
            format!("Upcoming payment: {}", subscription.name)
        },
        _ => format!("Payment due today: {}", subscription.name),
    };

    NotificationPayload {
        title,
        body: format!("Amount: ${}", format_amount(&subscription.price)),
        icon: subscription
            .logo
            .clone()
            .unwrap_or_else(|| String::from(ICON_FALLBACK)),
        tag: format!("{}{}", TAG_PREFIX, subscription.id),
        data: NotificationData {
            url: format!("/subscriptions/{}", subscription.id),
        },
        require_interaction: true,
    }
}

#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub users: usize,
    pub subscriptions: usize,
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

pub fn group_by_user(
    rows: Vec<DueSubscription>,
) -> BTreeMap<Uuid, Vec<DueSubscription>> {
    let mut grouped: BTreeMap<Uuid, Vec<DueSubscription>> = BTreeMap::new();

    for row in rows {
        grouped.entry(row.user_id).or_default().push(row);
    }

    grouped
}

/// Fan-out for one user: one attempt per (due subscription, endpoint) pair.
/// The endpoint list is fetched once by the caller and reused across the
/// user's subscriptions. A failed attempt is recorded and the loop moves on.
pub async fn dispatch_user<F, Fut>(
    due: &[DueSubscription],
    endpoints: &[PushSubscription],
    today: NaiveDate,
    send: F,
) -> Vec<DeliveryOutcome>
where
    F: Fn(PushSubscription, NotificationPayload) -> Fut,
    Fut: Future<Output = Result<u16, Error>>,
{
    let mut outcomes = Vec::new();

    for subscription in due {
        let status = classify(subscription.next_billing_date, today);

        if status == DueStatus::NotDue {
            continue;
        }

        let payload = build_payload(subscription, status);

        for endpoint in endpoints {
            match send(endpoint.clone(), payload.clone()).await {
                Ok(code) if (200..300).contains(&code) => {
                    outcomes.push(DeliveryOutcome::Delivered);
                },
                Ok(code) => {
                    warn!(
                        "Push rejected for user {} (status {})",
                        endpoint.user_id, code
                    );
                    outcomes
                        .push(DeliveryOutcome::Failed(format!("status {}", code)));
                },
                Err(e) => {
                    warn!("Push failed for user {}: {}", endpoint.user_id, e);
                    outcomes.push(DeliveryOutcome::Failed(e.to_string()));
                },
            }
        }
    }

    outcomes
}

/// One full batch pass. Only the initial due-subscription fetch can fail
/// the run; everything past it degrades per user or per delivery.
pub async fn notify_due_subscriptions(
    app_state: &AppState<State>,
) -> Result<BatchReport, Error> {
    let today = Local::now().date_naive();
    let rows = app_state.database.subscription.get_due(today).await?;

    let mut report = BatchReport {
        subscriptions: rows.len(),
        ..Default::default()
    };

    let grouped = group_by_user(rows);
    report.users = grouped.len();

    for (user_id, due) in grouped {
        let endpoints = match app_state
            .database
            .push_subscription
            .get_by_user(user_id)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    "Skipping user {}: failed to load push endpoints: {}",
                    user_id, e
                );
                continue;
            },
        };

        let send = |endpoint: PushSubscription, payload: NotificationPayload| {
            let state = app_state.clone();
            async move {
                send_push::send_web_push(&state, &endpoint, &payload).await
            }
        };

        let outcomes = dispatch_user(&due, &endpoints, today, send).await;

        for outcome in &outcomes {
            match outcome {
                DeliveryOutcome::Delivered => report.delivered += 1,
                DeliveryOutcome::Failed(_) => report.failed += 1,
            }
        }
        report.attempted += outcomes.len();
    }

    info!(
        "Due-subscription pass complete: {} users, {} subscriptions, {} attempted, {} delivered, {} failed",
        report.users,
        report.subscriptions,
        report.attempted,
        report.delivered,
        report.failed
    );

    Ok(report)
}

fn seconds_until_next_run(now: NaiveDateTime, hour: u32) -> u64 {
    let today_run = now
        .date()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| now.date().and_time(NaiveTime::MIN));

    let next = if now < today_run {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };

    (next - now).num_seconds().max(1) as u64
}

/// Background task: sleeps until the configured local hour, runs the pass,
/// then repeats daily. A failed pass is logged and the loop keeps going.
pub async fn notify_task(app_state: AppState<State>) -> Result<(), Error> {
    info!(
        "Scheduled due-subscription notification job at {:02}:00 local time",
        app_state.config.notify_hour
    );

    loop {
        let wait = seconds_until_next_run(
            Local::now().naive_local(),
            app_state.config.notify_hour,
        );
        time::sleep(Duration::from_secs(wait)).await;

        if let Err(e) = notify_due_subscriptions(&app_state).await {
            error!("Due-subscription pass failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due_subscription(name: &str, price: &str, due: NaiveDate) -> DueSubscription {
        DueSubscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: String::from(name),
            price: BigDecimal::from_str(price).unwrap(),
            logo: None,
            next_billing_date: due,
        }
    }

    fn endpoint(user_id: Uuid, url: &str) -> PushSubscription {
        PushSubscription {
            user_id,
            endpoint: String::from(url),
            p256dh: String::from("p256dh-key"),
            auth: String::from("auth-key"),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_classify_today_tomorrow_not_due() {
        let today = date(2026, 8, 4);

        assert_eq!(classify(date(2026, 8, 4), today), DueStatus::DueToday);
        assert_eq!(classify(date(2026, 8, 5), today), DueStatus::DueTomorrow);
        assert_eq!(classify(date(2026, 8, 6), today), DueStatus::NotDue);
        assert_eq!(classify(date(2026, 8, 7), today), DueStatus::NotDue);
        // yesterday: no catch-up notification
        assert_eq!(classify(date(2026, 8, 3), today), DueStatus::NotDue);
        assert_eq!(classify(date(2025, 8, 4), today), DueStatus::NotDue);
    }

    #[test]
    fn test_classify_across_month_boundary() {
        let today = date(2026, 1, 31);
        assert_eq!(classify(date(2026, 2, 1), today), DueStatus::DueTomorrow);
    }

    #[test]
    fn test_format_amount_two_decimals() {
        let cases = [
            ("9.999", "10.00"),
            ("12.5", "12.50"),
            ("15", "15.00"),
            ("0.005", "0.01"),
            ("100", "100.00"),
        ];

        for (input, expected) in cases {
            let price = BigDecimal::from_str(input).unwrap();
            assert_eq!(format_amount(&price), expected, "price {}", input);
        }
    }

    #[test]
    fn test_payload_due_today() {
        let today = date(2026, 8, 4);
        let sub = due_subscription("Netflix", "15", today);

        let payload = build_payload(&sub, classify(sub.next_billing_date, today));

        assert_eq!(payload.title, "Payment due today: Netflix");
        assert_eq!(payload.body, "Amount: $15.00");
        assert_eq!(payload.icon, ICON_FALLBACK);
        assert_eq!(payload.tag, format!("subscription-{}", sub.id));
        assert_eq!(payload.data.url, format!("/subscriptions/{}", sub.id));
        assert!(payload.require_interaction);
    }

    #[test]
    fn test_payload_due_tomorrow_with_logo() {
        let today = date(2026, 8, 4);
        let mut sub = due_subscription("Spotify", "9.999", date(2026, 8, 5));
        sub.logo = Some(String::from("https://cdn.example.com/spotify.png"));

        let payload = build_payload(&sub, classify(sub.next_billing_date, today));

        assert_eq!(payload.title, "Upcoming payment: Spotify");
        assert_eq!(payload.body, "Amount: $10.00");
        assert_eq!(payload.icon, "https://cdn.example.com/spotify.png");
    }

    #[test]
    fn test_payload_json_uses_notification_api_names() {
        let today = date(2026, 8, 4);
        let sub = due_subscription("Netflix", "15", today);
        let payload = build_payload(&sub, DueStatus::DueToday);

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["requireInteraction"], true);
        assert!(json["data"]["url"].is_string());
        assert!(json.get("require_interaction").is_none());
    }

    #[test]
    fn test_group_by_user() {
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let today = date(2026, 8, 4);

        let mut one = due_subscription("One", "1", today);
        one.user_id = user_a;
        let mut two = due_subscription("Two", "2", today);
        two.user_id = user_b;
        let mut three = due_subscription("Three", "3", today);
        three.user_id = user_a;

        let grouped = group_by_user(vec![one, two, three]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get(&user_a).unwrap().len(), 2);
        assert_eq!(grouped.get(&user_b).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_attempts_once_per_pair() {
        let today = date(2026, 8, 4);
        let user_id = Uuid::new_v4();

        let due = vec![
            due_subscription("Netflix", "15", today),
            due_subscription("Spotify", "9.99", date(2026, 8, 5)),
        ];
        let endpoints = vec![
            endpoint(user_id, "https://push.example.com/a"),
            endpoint(user_id, "https://push.example.com/b"),
            endpoint(user_id, "https://push.example.com/c"),
        ];

        let attempts = RefCell::new(0_usize);
        let send = |_: PushSubscription, _: NotificationPayload| {
            *attempts.borrow_mut() += 1;
            async { Ok(201_u16) }
        };

        let outcomes = dispatch_user(&due, &endpoints, today, send).await;

        // k subscriptions x m endpoints
        assert_eq!(*attempts.borrow(), 6);
        assert_eq!(outcomes.len(), 6);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, DeliveryOutcome::Delivered)));
    }

    #[tokio::test]
    async fn test_dispatch_failure_does_not_stop_fan_out() {
        let today = date(2026, 8, 4);
        let user_id = Uuid::new_v4();

        let due = vec![due_subscription("Netflix", "15", today)];
        let endpoints = vec![
            endpoint(user_id, "https://push.example.com/dead"),
            endpoint(user_id, "https://push.example.com/alive"),
        ];

        let delivered_to = RefCell::new(Vec::new());
        let send = |target: PushSubscription, _: NotificationPayload| {
            let failed = target.endpoint.ends_with("/dead");
            delivered_to.borrow_mut().push(target.endpoint);
            async move {
                if failed {
                    Err(Error::ServerError(String::from("410 Gone")))
                } else {
                    Ok(200_u16)
                }
            }
        };

        let outcomes = dispatch_user(&due, &endpoints, today, send).await;

        assert_eq!(delivered_to.borrow().len(), 2);
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, DeliveryOutcome::Delivered))
                .count(),
            1
        );
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, DeliveryOutcome::Failed(_)))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_dispatch_non_success_status_is_failed() {
        let today = date(2026, 8, 4);
        let user_id = Uuid::new_v4();

        let due = vec![due_subscription("Netflix", "15", today)];
        let endpoints = vec![endpoint(user_id, "https://push.example.com/a")];

        let send =
            |_: PushSubscription, _: NotificationPayload| async { Ok(410_u16) };

        let outcomes = dispatch_user(&due, &endpoints, today, send).await;

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(&outcomes[0], DeliveryOutcome::Failed(reason) if reason.contains("410")));
    }

    #[tokio::test]
    async fn test_dispatch_not_due_sends_nothing() {
        let today = date(2026, 8, 4);
        let user_id = Uuid::new_v4();

        // due in 3 days
        let due = vec![due_subscription("Netflix", "15", date(2026, 8, 7))];
        let endpoints = vec![endpoint(user_id, "https://push.example.com/a")];

        let attempts = RefCell::new(0_usize);
        let send = |_: PushSubscription, _: NotificationPayload| {
            *attempts.borrow_mut() += 1;
            async { Ok(200_u16) }
        };

        let outcomes = dispatch_user(&due, &endpoints, today, send).await;

        assert_eq!(*attempts.borrow(), 0);
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_without_endpoints_is_a_noop() {
        let today = date(2026, 8, 4);

        let due = vec![
            due_subscription("Netflix", "15", today),
            due_subscription("Spotify", "9.99", today),
        ];

        let send =
            |_: PushSubscription, _: NotificationPayload| async { Ok(200_u16) };

        let outcomes = dispatch_user(&due, &[], today, send).await;

        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_netflix_scenario_payload() {
        let today = date(2026, 8, 4);
        let user_id = Uuid::new_v4();

        let due = vec![due_subscription("Netflix", "15", today)];
        let endpoints = vec![endpoint(user_id, "https://push.example.com/a")];

        let payloads = RefCell::new(Vec::new());
        let send = |_: PushSubscription, payload: NotificationPayload| {
            payloads.borrow_mut().push(payload);
            async { Ok(200_u16) }
        };

        let outcomes = dispatch_user(&due, &endpoints, today, send).await;

        assert_eq!(outcomes.len(), 1);
        let payloads = payloads.borrow();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].title, "Payment due today: Netflix");
        assert_eq!(payloads[0].body, "Amount: $15.00");
    }

    #[test]
    fn test_seconds_until_next_run() {
        let now = date(2026, 8, 4).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(seconds_until_next_run(now, 11), 2 * 60 * 60);

        // already past today's run: schedule for tomorrow
        let now = date(2026, 8, 4).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(seconds_until_next_run(now, 11), 23 * 60 * 60);

        // exactly at the run hour counts as past
        let now = date(2026, 8, 4).and_hms_opt(11, 0, 0).unwrap();
        assert_eq!(seconds_until_next_run(now, 11), 24 * 60 * 60);
    }
}
