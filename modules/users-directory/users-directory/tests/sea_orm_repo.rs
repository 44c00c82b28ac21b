#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `SeaOrmUsersRepository` against in-memory `SQLite`.

mod support;

use time::{Duration, OffsetDateTime};
use users_directory::UserFilter;
use users_directory::domain::error::DomainError;
use users_directory::domain::patch::UserPatch;
use users_directory::domain::repo::{ListWindow, NewUserRecord, UsersRepository};
use uuid::Uuid;

use support::sqlite_repo;

fn record(nickname: &str, country: &str, created_at: OffsetDateTime) -> NewUserRecord {
    NewUserRecord {
        id: Uuid::now_v7(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        nickname: nickname.to_owned(),
        email: format!("{nickname}@example.com"),
        country: country.to_owned(),
        password_hash: "hash".to_owned(),
        created_at,
        updated_at: created_at,
    }
}

fn t0() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

const ALL: ListWindow = ListWindow {
    offset: 0,
    limit: 100,
};

#[tokio::test]
async fn create_reads_back_the_stored_row() {
    let repo = sqlite_repo().await;
    let rec = record("ada", "UK", t0());

    let user = repo.create(rec.clone()).await.unwrap().expect("row");
    assert_eq!(user.id, rec.id);
    assert_eq!(user.nickname, "ada");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.created_at, t0());
    assert_eq!(user.updated_at, t0());
}

#[tokio::test]
async fn duplicate_nickname_or_email_is_rejected() {
    let repo = sqlite_repo().await;
    repo.create(record("ada", "UK", t0())).await.unwrap();

    let same_nick = record("ada", "FR", t0());
    let err = repo.create(same_nick).await.unwrap_err();
    assert!(matches!(err, DomainError::UserAlreadyExists), "{err:?}");

    let mut same_email = record("grace", "US", t0());
    same_email.email = "ada@example.com".to_owned();
    let err = repo.create(same_email).await.unwrap_err();
    assert!(matches!(err, DomainError::UserAlreadyExists), "{err:?}");

    assert_eq!(repo.list(&UserFilter::default(), ALL).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_touches_only_present_fields() {
    let repo = sqlite_repo().await;
    let user = repo.create(record("ada", "UK", t0())).await.unwrap().unwrap();
    let later = t0() + Duration::minutes(5);

    let patch = UserPatch {
        country: Some("FR".to_owned()),
        last_name: Some(String::new()),
        ..UserPatch::default()
    }
    .with_updated_at(later);
    let updated = repo.update(user.id, patch).await.unwrap().unwrap();

    assert_eq!(updated.country, "FR");
    assert_eq!(updated.last_name, "");
    assert_eq!(updated.first_name, user.first_name);
    assert_eq!(updated.nickname, user.nickname);
    assert_eq!(updated.email, user.email);
    assert_eq!(updated.created_at, user.created_at);
    assert_eq!(updated.updated_at, later);
}

#[tokio::test]
async fn update_into_a_taken_email_conflicts() {
    let repo = sqlite_repo().await;
    repo.create(record("ada", "UK", t0())).await.unwrap();
    let grace = repo.create(record("grace", "US", t0())).await.unwrap().unwrap();

    let patch = UserPatch {
        email: Some("ada@example.com".to_owned()),
        ..UserPatch::default()
    };
    let err = repo.update(grace.id, patch).await.unwrap_err();
    assert!(matches!(err, DomainError::UserAlreadyExists), "{err:?}");
}

#[tokio::test]
async fn missing_targets_are_not_found() {
    let repo = sqlite_repo().await;
    let id = Uuid::now_v7();

    let patch = UserPatch {
        country: Some("FR".to_owned()),
        ..UserPatch::default()
    };
    let err = repo.update(id, patch).await.unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound { .. }), "{err:?}");

    let err = repo.delete(id).await.unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn delete_removes_the_row() {
    let repo = sqlite_repo().await;
    let user = repo.create(record("ada", "UK", t0())).await.unwrap().unwrap();

    repo.delete(user.id).await.unwrap();
    assert!(repo.list(&UserFilter::default(), ALL).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_ordered_by_creation_and_windowed() {
    let repo = sqlite_repo().await;
    // inserted out of creation order
    for (nick, minutes) in [("c", 2), ("a", 0), ("d", 3), ("b", 1)] {
        repo.create(record(nick, "NL", t0() + Duration::minutes(minutes)))
            .await
            .unwrap();
    }

    let all = repo.list(&UserFilter::default(), ALL).await.unwrap();
    let order: Vec<&str> = all.iter().map(|u| u.nickname.as_str()).collect();
    assert_eq!(order, ["a", "b", "c", "d"]);

    let window = ListWindow {
        offset: 1,
        limit: 2,
    };
    let page = repo.list(&UserFilter::default(), window).await.unwrap();
    let order: Vec<&str> = page.iter().map(|u| u.nickname.as_str()).collect();
    assert_eq!(order, ["b", "c"]);
}

#[tokio::test]
async fn list_orders_sub_second_creation_times() {
    let repo = sqlite_repo().await;
    // inserted latest first; whole, half and odd fractional seconds
    for (nick, micros) in [
        ("later", 500_000),
        ("mid2", 123_456),
        ("mid1", 123_450),
        ("earlier", 0),
    ] {
        repo.create(record(nick, "NL", t0() + Duration::microseconds(micros)))
            .await
            .unwrap();
    }

    let all = repo.list(&UserFilter::default(), ALL).await.unwrap();
    let order: Vec<&str> = all.iter().map(|u| u.nickname.as_str()).collect();
    assert_eq!(order, ["earlier", "mid1", "mid2", "later"]);
    assert_eq!(all[3].created_at, t0() + Duration::milliseconds(500));
}

#[tokio::test]
async fn list_past_the_bindable_offset_is_empty() {
    let repo = sqlite_repo().await;
    repo.create(record("ada", "UK", t0())).await.unwrap();

    let window = ListWindow {
        offset: u64::MAX - 10,
        limit: 11,
    };
    assert!(repo.list(&UserFilter::default(), window).await.unwrap().is_empty());

    let huge_limit = ListWindow {
        offset: 0,
        limit: u64::MAX,
    };
    assert_eq!(repo.list(&UserFilter::default(), huge_limit).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_applies_every_present_predicate() {
    let repo = sqlite_repo().await;
    repo.create(record("ada", "UK", t0())).await.unwrap();
    repo.create(record("alan", "UK", t0())).await.unwrap();
    let mut grace = record("grace", "US", t0());
    grace.first_name = "Grace".to_owned();
    repo.create(grace).await.unwrap();

    let uk = UserFilter {
        country: Some("UK".to_owned()),
        ..UserFilter::default()
    };
    assert_eq!(repo.list(&uk, ALL).await.unwrap().len(), 2);

    let grace_in_uk = UserFilter {
        first_name: Some("Grace".to_owned()),
        country: Some("UK".to_owned()),
        ..UserFilter::default()
    };
    assert!(repo.list(&grace_in_uk, ALL).await.unwrap().is_empty());
}
