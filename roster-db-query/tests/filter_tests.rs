//! Integration tests for the filter engine
//!
//! These verify the seed/refine contract:
//! - chain order never changes the matching id set
//! - seeding from an index and refining a superset agree for every filter
//! - containment semantics (ALL vs AT LEAST ONE) and premium boundaries

use roster_db_core::{Account, Catalog, Like, Premium, Sex};
use roster_db_query::filter::{filter_accounts, AccountFilter};
use roster_db_query::predicate::{StringPredicate, TimePredicate};
use roster_db_query::WorkingSet;

fn account(id: i64) -> Account {
    Account {
        id,
        email: format!("user{id}@example.com"),
        fname: String::new(),
        sname: String::new(),
        phone: String::new(),
        sex: Sex::Male,
        birth: 0,
        country: String::new(),
        city: String::new(),
        joined: 0,
        status: "free".to_string(),
        interests: Vec::new(),
        likes: Vec::new(),
        premium: None,
        interest_set: Default::default(),
        like_set: Default::default(),
    }
}

/// A small mixed population exercising every indexed field
fn fixture() -> Catalog {
    let mut a1 = account(1);
    a1.email = "ada@mail.ru".to_string();
    a1.fname = "Ada".to_string();
    a1.sname = "Lovelace".to_string();
    a1.phone = "8(921)5554433".to_string();
    a1.sex = Sex::Female;
    a1.birth = 631152000; // 1990-01-01Z
    a1.country = "UK".to_string();
    a1.city = "London".to_string();
    a1.interests = vec!["math".to_string(), "code".to_string()];
    a1.likes = vec![Like { id: 2, ts: 100 }, Like { id: 3, ts: 200 }];
    a1.premium = Some(Premium {
        start: 1000,
        finish: 2000,
    });

    let mut a2 = account(2);
    a2.email = "bob@mail.com".to_string();
    a2.fname = "Bob".to_string();
    a2.sex = Sex::Male;
    a2.birth = 662688000; // 1991-01-01Z
    a2.country = "UK".to_string();
    a2.interests = vec!["math".to_string()];
    a2.likes = vec![Like { id: 3, ts: 300 }];

    let mut a3 = account(3);
    a3.email = "eve@mail.ru".to_string();
    a3.sex = Sex::Female;
    a3.birth = 631152001;
    a3.country = "DE".to_string();
    a3.city = "Berlin".to_string();
    a3.status = "busy".to_string();
    a3.interests = vec!["code".to_string(), "tea".to_string()];
    a3.premium = Some(Premium {
        start: 1500,
        finish: 1500,
    });

    Catalog::from_accounts(vec![a1, a2, a3])
}

fn ids(working: &WorkingSet) -> Vec<i64> {
    let mut out: Vec<i64> = working.keys().copied().collect();
    out.sort_unstable();
    out
}

/// A filter matching every fixture account, used to pre-seed a superset so
/// the filter under test runs in refine mode
fn match_all() -> AccountFilter {
    AccountFilter::Status(StringPredicate::NotEqual("no-such-status".into()))
}

fn every_filter() -> Vec<(AccountFilter, Vec<i64>)> {
    vec![
        (
            AccountFilter::Email(StringPredicate::Domain("mail.ru".into())),
            vec![1, 3],
        ),
        (
            AccountFilter::Email(StringPredicate::Lt("b".into())),
            vec![1],
        ),
        (
            AccountFilter::Email(StringPredicate::Gt("c".into())),
            vec![3],
        ),
        (
            AccountFilter::Fname(StringPredicate::any("Ada,Eve")),
            vec![1],
        ),
        (
            AccountFilter::Fname(StringPredicate::null("1")),
            vec![3],
        ),
        (
            AccountFilter::Sname(StringPredicate::Starts("Love".into())),
            vec![1],
        ),
        (
            AccountFilter::Phone(StringPredicate::Code("921".into())),
            vec![1],
        ),
        (
            AccountFilter::Phone(StringPredicate::null("0")),
            vec![1],
        ),
        (
            AccountFilter::Phone(StringPredicate::null("1")),
            vec![2, 3],
        ),
        (
            AccountFilter::Country(StringPredicate::Equal("UK".into())),
            vec![1, 2],
        ),
        (
            AccountFilter::City(StringPredicate::null("1")),
            vec![2],
        ),
        (
            AccountFilter::Status(StringPredicate::NotEqual("free".into())),
            vec![3],
        ),
        (AccountFilter::sex("f").unwrap(), vec![1, 3]),
        (
            AccountFilter::Birth(TimePredicate::before("631152001").unwrap()),
            vec![1],
        ),
        (
            AccountFilter::Birth(TimePredicate::after("631152000").unwrap()),
            vec![2, 3],
        ),
        (
            AccountFilter::Birth(TimePredicate::year("1990").unwrap()),
            vec![1, 3],
        ),
        (AccountFilter::interests_any("math,tea"), vec![1, 2, 3]),
        (AccountFilter::interests_contains("math,code"), vec![1]),
        (AccountFilter::likes_contains("2,3"), vec![1]),
        (AccountFilter::premium_null("1"), vec![2]),
        (AccountFilter::premium_null("0"), vec![1, 3]),
        (AccountFilter::premium_now("1500").unwrap(), vec![1, 3]),
    ]
}

#[test]
fn seed_matches_expected_ids() {
    let catalog = fixture();
    for (filter, expected) in every_filter() {
        let seeded = filter_accounts(&catalog, std::slice::from_ref(&filter));
        assert_eq!(ids(&seeded), expected, "seed mode for {filter:?}");
    }
}

#[test]
fn seed_and_refine_agree_for_every_filter() {
    let catalog = fixture();
    for (filter, expected) in every_filter() {
        let refined = filter_accounts(&catalog, &[match_all(), filter.clone()]);
        assert_eq!(ids(&refined), expected, "refine mode for {filter:?}");
    }
}

#[test]
fn chain_order_never_changes_the_result() {
    let catalog = fixture();
    let filters = [
        AccountFilter::sex("f").unwrap(),
        AccountFilter::Email(StringPredicate::Domain("mail.ru".into())),
        AccountFilter::interests_any("code,tea"),
    ];

    let permutations: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let baseline = ids(&filter_accounts(&catalog, &filters));
    assert_eq!(baseline, vec![1, 3]);
    for perm in permutations {
        let chain: Vec<AccountFilter> = perm.iter().map(|&i| filters[i].clone()).collect();
        assert_eq!(ids(&filter_accounts(&catalog, &chain)), baseline, "{perm:?}");
    }
}

#[test]
fn contains_requires_all_listed_values() {
    let catalog = fixture();

    // partial overlap is not enough
    let partial = filter_accounts(&catalog, &[AccountFilter::interests_contains("math,tea")]);
    assert!(ids(&partial).is_empty());

    let full = filter_accounts(&catalog, &[AccountFilter::interests_contains("code")]);
    assert_eq!(ids(&full), vec![1, 3]);

    let likes = filter_accounts(&catalog, &[AccountFilter::likes_contains("3")]);
    assert_eq!(ids(&likes), vec![1, 2]);
    let likes_all = filter_accounts(&catalog, &[AccountFilter::likes_contains("2,3")]);
    assert_eq!(ids(&likes_all), vec![1]);
}

#[test]
fn any_requires_at_least_one_listed_value() {
    let catalog = fixture();
    let none = filter_accounts(&catalog, &[AccountFilter::interests_any("golf")]);
    assert!(ids(&none).is_empty());
    let some = filter_accounts(&catalog, &[AccountFilter::interests_any("tea,golf")]);
    assert_eq!(ids(&some), vec![3]);
}

#[test]
fn premium_now_bounds_are_inclusive() {
    let catalog = fixture();
    // account 3 has start == finish == 1500
    for (ts, expected) in [
        ("1500", vec![1, 3]),
        ("1499", vec![1]),
        ("1501", vec![1]),
        ("2000", vec![1]),
        ("2001", Vec::new()),
        ("999", Vec::new()),
    ] {
        let filter = AccountFilter::premium_now(ts).unwrap();
        assert_eq!(ids(&filter_accounts(&catalog, &[filter])), expected, "ts={ts}");
    }
}

#[test]
fn conjunction_intersects_filters() {
    let catalog = fixture();
    let working = filter_accounts(
        &catalog,
        &[
            AccountFilter::Country(StringPredicate::Equal("UK".into())),
            AccountFilter::sex("f").unwrap(),
        ],
    );
    assert_eq!(ids(&working), vec![1]);
}
