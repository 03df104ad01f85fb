//! # Seed Data
//!
//! The sample dataset written on first run and whenever the stored blob
//! cannot be read. Its content is fixed; only record ids (fresh UUIDs)
//! and dates (relative to `today`) differ between two seeds.

use chrono::{DateTime, NaiveDate, Utc};

use homecare_core::records::{DONATION_TYPE_FUNDS, DONATION_TYPE_GOODS};
use homecare_core::temporal::{format_iso_date, offset_days};
use homecare_core::{
    Announcement, AppState, Child, Donation, EducationRecord, HealthRecord, InventoryItem,
    RecordId, StaffMember,
};

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn days_ago(today: NaiveDate, days: i64) -> Option<String> {
    Some(format_iso_date(offset_days(today, -days)))
}

fn child(name: &str, gender: &str, dob: &str, admission_date: &str) -> Child {
    Child {
        id: RecordId::generate(),
        name: text(name),
        gender: text(gender),
        dob: text(dob),
        status: text("Resident"),
        admission_date: text(admission_date),
        ..Default::default()
    }
}

fn staff(name: &str, role: &str, phone: &str) -> StaffMember {
    StaffMember {
        id: RecordId::generate(),
        name: text(name),
        role: text(role),
        phone: text(phone),
        ..Default::default()
    }
}

fn stock(item: &str, qty: f64, min: f64, category: &str, cost: f64) -> InventoryItem {
    InventoryItem {
        id: RecordId::generate(),
        item: text(item),
        qty: Some(qty),
        min: Some(min),
        category: text(category),
        cost: Some(cost),
        ..Default::default()
    }
}

/// Build the sample dataset.
///
/// `today` anchors the relative record dates; `created_at` becomes
/// `meta.createdAt`.
pub fn seed(today: NaiveDate, created_at: DateTime<Utc>) -> AppState {
    let mut state = AppState::empty(created_at);

    state.children = vec![
        child("Amina K", "F", "2014-03-11", "2021-06-01"),
        child("Brian O", "M", "2012-11-22", "2020-09-15"),
        child("Chloe N", "F", "2016-02-05", "2022-02-12"),
    ];

    state.staff = vec![
        staff("Grace Mwangi", "Caregiver", "0700 111 222"),
        staff("David Kim", "Nurse", "0700 333 444"),
    ];

    state.donations = vec![
        Donation {
            id: RecordId::generate(),
            donor: text("Hope Foundation"),
            kind: text(DONATION_TYPE_FUNDS),
            amount: Some(1500.0),
            date: days_ago(today, 20),
            ..Default::default()
        },
        Donation {
            id: RecordId::generate(),
            donor: text("Local Bakery"),
            kind: text(DONATION_TYPE_GOODS),
            amount: Some(0.0),
            date: days_ago(today, 10),
            note: text("Bread & snacks"),
            ..Default::default()
        },
        Donation {
            id: RecordId::generate(),
            donor: text("J. Patel"),
            kind: text(DONATION_TYPE_FUNDS),
            amount: Some(800.0),
            date: days_ago(today, 2),
            ..Default::default()
        },
    ];

    state.inventory = vec![
        stock("Rice (kg)", 120.0, 60.0, "Food", 120.0),
        stock("Milk (L)", 40.0, 50.0, "Food", 80.0),
        stock("Soap (bars)", 25.0, 20.0, "Hygiene", 50.0),
    ];

    state.health = vec![
        HealthRecord {
            id: RecordId::generate(),
            child: text("Amina K"),
            kind: text("Checkup"),
            date: days_ago(today, 5),
            notes: text("Routine health check"),
            medical_bill: Some(500.0),
            ..Default::default()
        },
        HealthRecord {
            id: RecordId::generate(),
            child: text("Brian O"),
            kind: text("Treatment"),
            date: days_ago(today, 2),
            notes: text("Fever treatment"),
            medical_bill: Some(1200.0),
            ..Default::default()
        },
    ];

    state.education = vec![
        EducationRecord {
            id: RecordId::generate(),
            child: text("Amina K"),
            school: text("Moi Primary"),
            grade: text("Grade 6"),
            term: text("Term 2"),
            date: days_ago(today, 30),
            notes: text("School fees payment"),
            fees: Some(8500.0),
            ..Default::default()
        },
        EducationRecord {
            id: RecordId::generate(),
            child: text("Chloe N"),
            school: text("Sunshine Academy"),
            grade: text("Grade 2"),
            term: text("Term 1"),
            date: days_ago(today, 15),
            notes: text("First term fees"),
            fees: Some(12000.0),
            ..Default::default()
        },
    ];

    state.announcements = vec![Announcement {
        id: RecordId::generate(),
        message: text("Clinic visit on Friday 10am"),
        date: days_ago(today, 1),
        ..Default::default()
    }];

    state
}
