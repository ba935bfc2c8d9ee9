//! Owner isolation: records never leak or yield across identities, even
//! when one owner supplies another owner's identifiers.

use chrono::{NaiveDate, NaiveTime};
use pawplan_core::model::pet::{NewPet, Pet, Species};
use pawplan_core::model::task::{NewTask, Task, TaskKind};
use pawplan_core::{Identity, Session, Store, StoreError};

fn session(id: &str) -> Session {
    Session::authenticated(Identity::new(id))
}

fn corgi() -> NewPet {
    NewPet {
        name: "Biscuit".to_string(),
        breed: "Corgi".to_string(),
        age: 3.0,
        weight: 11.5,
        species: Species::Dog,
        photo: None,
    }
}

fn seed_owner_a(store: &mut Store, owner_a: &Session) -> (Pet, Task) {
    let pet = store.create_pet(owner_a, &corgi()).expect("create pet");
    let task = store
        .create_task(
            owner_a,
            &NewTask {
                pet_id: pet.id.clone(),
                title: "Walk".to_string(),
                time: NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
                date: NaiveDate::from_ymd_opt(2025, 6, 20).expect("valid date"),
                kind: TaskKind::Walk,
            },
        )
        .expect("create task");
    (pet, task)
}

#[test]
fn listings_never_cross_owners_even_with_a_guessed_pet_id() {
    let mut store = Store::open_in_memory().expect("open store");
    let owner_a = session("uid-a");
    let owner_b = session("uid-b");
    let (pet, _) = seed_owner_a(&mut store, &owner_a);

    assert!(store.pets(&owner_b).expect("list pets").is_empty());

    // B knows A's pet id; the owner filter still wins.
    let leaked = store.tasks_by_pet(&owner_b, &pet.id).expect("list tasks");
    assert!(leaked.is_empty());

    // A still sees everything.
    assert_eq!(store.tasks_by_pet(&owner_a, &pet.id).expect("list").len(), 1);
}

#[test]
fn mutations_against_foreign_records_fail_closed() {
    let mut store = Store::open_in_memory().expect("open store");
    let owner_a = session("uid-a");
    let owner_b = session("uid-b");
    let (pet, task) = seed_owner_a(&mut store, &owner_a);

    assert!(matches!(
        store.update_pet(&owner_b, &pet),
        Err(StoreError::PetNotFound { .. })
    ));
    assert!(matches!(
        store.delete_pet(&owner_b, &pet.id),
        Err(StoreError::PetNotFound { .. })
    ));
    assert!(matches!(
        store.toggle_task(&owner_b, &task),
        Err(StoreError::StaleTaskId { .. })
    ));
    assert!(matches!(
        store.update_task(&owner_b, &task),
        Err(StoreError::StaleTaskId { .. })
    ));
    assert!(matches!(
        store.delete_task(&owner_b, &task.id),
        Err(StoreError::StaleTaskId { .. })
    ));

    // Nothing moved or vanished for A.
    let tasks = store.tasks_by_pet(&owner_a, &pet.id).expect("list");
    assert_eq!(tasks, vec![task]);
    assert_eq!(store.pets(&owner_a).expect("list"), vec![pet]);
}

#[test]
fn anonymous_sessions_read_empty_and_cannot_write() {
    let mut store = Store::open_in_memory().expect("open store");
    let owner_a = session("uid-a");
    let nobody = Session::anonymous();
    let (pet, task) = seed_owner_a(&mut store, &owner_a);

    assert!(store.pets(&nobody).expect("list pets").is_empty());
    assert!(store.tasks_by_pet(&nobody, &pet.id).expect("list").is_empty());

    assert!(matches!(
        store.create_pet(&nobody, &corgi()),
        Err(StoreError::Unauthenticated)
    ));
    assert!(matches!(
        store.toggle_task(&nobody, &task),
        Err(StoreError::Unauthenticated)
    ));
}
