//! Event stream synthesis
//!
//! Company streams tell a monotonic device story: every provisioning batch
//! is bounded by the devices purchased so far, so cumulative provisioned
//! can never exceed cumulative purchased at any point in the timeline.
//! User streams mix calls (paired start/end), skewed-positive ratings,
//! comments keyed to the rating, dial-ins, and support tickets.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use beacon_model::{CompanyEvent, UserEvent, UserEventKind};

use crate::shape::{clamp_instant, event_instant};
use crate::vocab::{BAD_COMMENTS, CALL_TYPES, GOOD_COMMENTS, OPERATING_SYSTEMS, TICKET_DRIVERS};

/// One synthetic user
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// Email address (the user identifier)
    pub email: String,
    /// Company the user belongs to
    pub company: String,
    /// Registration instant
    pub reg_date: DateTime<Utc>,
}

fn serial_number(rng: &mut impl Rng) -> String {
    format!("A{}", rng.gen_range(100_000..2_000_000))
}

/// Build the purchase/provisioning stream for one company
///
/// `reg_date` anchors the story; `now` bounds it. All timestamps fall in
/// `[reg_date, now]`.
pub fn build_company_events(
    rng: &mut impl Rng,
    company: &str,
    reg_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<CompanyEvent> {
    let mut events = Vec::new();
    let mut total_purchased: i64 = 0;
    let mut total_provisioned: i64 = 0;

    // Initial purchase at registration
    let initial_purchase = rng.gen_range(1..=15);
    events.push(CompanyEvent::purchased(reg_date, company, initial_purchase));
    total_purchased += initial_purchase;

    // Initial provisioning a couple of weeks later
    let prov_date = clamp_instant(reg_date + Duration::days(rng.gen_range(2..=14)), reg_date, now);
    let initial_prov = rng.gen_range(1..=initial_purchase);
    for _ in 0..initial_prov {
        total_provisioned += 1;
        events.push(CompanyEvent::provisioned(
            prov_date,
            company,
            serial_number(rng),
            format!("{}.room.{:02}", company, total_provisioned),
        ));
    }

    // Follow-on purchases spread across the rest of the timeline
    let span = now - reg_date;
    let months_since_reg = (span.num_days() / 30 + 1).max(1);
    let purchases = rng.gen_range(1..=2) * months_since_reg;

    for purchase in 1..purchases {
        let purchased = rng.gen_range(5..=15);
        let fraction = purchase as f64 / purchases as f64;
        let purchase_date = clamp_instant(
            reg_date + Duration::seconds((span.num_seconds() as f64 * fraction) as i64),
            reg_date,
            now,
        );

        events.push(CompanyEvent::purchased(purchase_date, company, purchased));
        total_purchased += purchased;

        let prov_date = clamp_instant(
            purchase_date + Duration::days(rng.gen_range(2..=14)),
            purchase_date,
            now,
        );
        // Never provision more than remains unprovisioned
        let available = total_purchased - total_provisioned;
        let prov_count = rng.gen_range(purchased / 2..=purchased).min(available);

        for _ in 0..prov_count {
            total_provisioned += 1;
            events.push(CompanyEvent::provisioned(
                prov_date,
                company,
                serial_number(rng),
                format!("{}.room.{:02}", company, total_provisioned),
            ));
        }
    }

    events
}

/// Build the full activity stream for one user
pub fn build_user_events(
    rng: &mut impl Rng,
    user: &UserProfile,
    now: DateTime<Utc>,
) -> Vec<UserEvent> {
    let mut events = Vec::new();

    events.push(UserEvent::new(
        UserEventKind::Register,
        user.reg_date,
        user.email.as_str(),
        user.company.as_str(),
    ));

    events.extend(build_ticket_events(rng, user, now));
    events.extend(build_call_events(rng, user, now));

    events
}

/// Support tickets at a per-user trouble rate
fn build_ticket_events(rng: &mut impl Rng, user: &UserProfile, now: DateTime<Utc>) -> Vec<UserEvent> {
    let mut events = Vec::new();

    let span = now - user.reg_date;
    let days_since_reg = span.num_days().max(0);
    let troubley: i64 = rng.gen_range(0..=3);
    let tickets = days_since_reg / (4 - troubley).max(1) / 2;

    for ticket in 0..tickets {
        let offset = span.num_seconds() / tickets.max(1) * ticket;
        let base = user.reg_date + Duration::seconds((offset as f64 / 1.1) as i64);
        let instant = clamp_instant(
            event_instant(rng, base.date_naive()),
            user.reg_date,
            now,
        );

        let mut event = UserEvent::new(
            UserEventKind::SupportTicket,
            instant,
            user.email.as_str(),
            user.company.as_str(),
        );
        event.ticket_number = Some(format!("{}-{}", user.email, ticket));
        event.ticket_driver = TICKET_DRIVERS.choose(rng).map(|d| d.to_string());
        events.push(event);
    }

    events
}

/// Calls with companion ratings, comments, and dial-ins
fn build_call_events(rng: &mut impl Rng, user: &UserProfile, now: DateTime<Utc>) -> Vec<UserEvent> {
    let mut events = Vec::new();

    let os = OPERATING_SYSTEMS.choose(rng).copied().unwrap_or("Linux");
    let span = now - user.reg_date;
    let days_since_reg = span.num_days().max(0);
    let freq: i64 = rng.gen_range(1..=10);
    let calls = days_since_reg / (11 - freq) * 10;

    // Per-user dispositions, fixed for the whole stream
    let happy: i32 = rng.gen_range(0..=2);
    let ratey: i32 = rng.gen_range(0..=2);
    let commenty: i32 = rng.gen_range(0..=2);
    let chatty: i64 = rng.gen_range(0..=4);

    for call in 0..calls {
        let call_happy = rng.gen_range(0..100) >= happy * 25;

        let rating: Option<i64> = if rng.gen_range(0..100) <= ratey * 40 {
            Some(if call_happy {
                rng.gen_range(4..=5)
            } else {
                rng.gen_range(1..=3)
            })
        } else {
            None
        };

        let comment = if rng.gen_range(0..100) <= commenty * 33 * ratey / 3 {
            let pool = if rating.unwrap_or(0) >= 3 {
                GOOD_COMMENTS
            } else {
                BAD_COMMENTS
            };
            pool.choose(rng).map(|c| c.to_string())
        } else {
            None
        };

        let call_minutes = chatty * rng.gen_range(5..=20i64);
        let dialin_minutes = (rng.gen_range(0..100) < 40).then_some(call_minutes);

        let call_type = match rng.gen_range(0..100) {
            0..=34 => CALL_TYPES[0],
            35..=69 => CALL_TYPES[1],
            70..=89 => CALL_TYPES[2],
            _ => CALL_TYPES[3],
        };

        let call_users: i64 = match rng.gen_range(0..100i64) {
            score @ 95..=99 => score - 90 + 5,
            0..=34 => 2,
            35..=69 => 3,
            _ => 4,
        };

        // Spread calls across the tenure with jitter, then shape the day
        let offset =
            span.num_seconds() / calls.max(1) * call + rng.gen_range(-36_000i64..36_000);
        let base = user.reg_date + Duration::seconds(offset);
        let started = clamp_instant(
            event_instant(rng, base.date_naive()),
            user.reg_date,
            now,
        );
        let ended = clamp_instant(started + Duration::minutes(call_minutes), started, now);

        let session_id = Uuid::new_v4().to_string();

        let mut start_event =
            UserEvent::new(UserEventKind::CallStarted, started, user.email.as_str(), user.company.as_str());
        start_event.call_type = Some(call_type.to_string());
        start_event.call_num_users = Some(call_users);
        start_event.call_os = Some(os.to_string());
        start_event.session_id = Some(session_id.clone());
        events.push(start_event);

        let mut end_event =
            UserEvent::new(UserEventKind::CallEnded, ended, user.email.as_str(), user.company.as_str());
        end_event.call_duration = Some(call_minutes);
        end_event.session_id = Some(session_id.clone());
        events.push(end_event);

        if let Some(rating) = rating {
            let mut event =
                UserEvent::new(UserEventKind::Rating, ended, user.email.as_str(), user.company.as_str());
            event.rating = Some(rating);
            event.session_id = Some(session_id.clone());
            events.push(event);
        }

        if let Some(comment) = comment {
            let mut event =
                UserEvent::new(UserEventKind::Comment, ended, user.email.as_str(), user.company.as_str());
            event.comment = Some(comment);
            event.session_id = Some(session_id.clone());
            events.push(event);
        }

        if let Some(minutes) = dialin_minutes {
            let mut event =
                UserEvent::new(UserEventKind::Dialin, started, user.email.as_str(), user.company.as_str());
            event.dialin_duration = Some(minutes);
            events.push(event);
        }
    }

    events
}
