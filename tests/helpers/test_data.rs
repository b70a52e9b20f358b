//! Test data builders

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use fivemgolf::models::IdentityAccount;

/// Bank transaction as the API returns it
pub fn bank_transaction(code: &str, direction: &str, amount: i64) -> Value {
    json!({
        "transaction_code": code,
        "direction": direction,
        "amount": amount,
        "counterparty": "Park Minsu",
        "memo": "5MGOLF booking",
        "transacted_at": "2024-10-01T09:30:00Z"
    })
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, day).unwrap()
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 2, 0, 0, 0).unwrap()
}

/// Quotation form body with two golf rounds and one room
pub fn quotation_body(people: u32) -> Value {
    json!({
        "title": "Kyushu autumn golf",
        "customer_name": "Lee Jiwoo",
        "contact": "010-1234-5678",
        "people": people,
        "golf_schedules": [
            {"date": date(1), "course_name": "Phoenix Country Club", "tee_time": "08:10", "note": null},
            {"date": date(2), "course_name": "Aso Grand Vrio", "tee_time": null, "note": null}
        ],
        "accommodation_schedules": [
            {"hotel_name": "Sheraton Grande Ocean", "check_in": date(1), "check_out": date(3), "note": null}
        ]
    })
}

pub fn identity_account(uid: &str, email: &str, role: &str) -> IdentityAccount {
    let now = Utc::now();
    IdentityAccount {
        uid: uid.to_string(),
        email: email.to_string(),
        display_name: Some(uid.to_string()),
        password_hash: None,
        disabled: false,
        claims: json!({ "role": role }),
        created_at: now,
        updated_at: now,
    }
}
