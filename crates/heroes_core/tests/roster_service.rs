use heroes_core::db::open_db_in_memory;
use heroes_core::{
    to_payload, NewHero, NewPower, PowerUpdate, SerializeOptions, ServiceError, SqliteRosterService,
    Strength, ValidationError,
};
use rusqlite::Connection;
use serde_json::Value;

const FLIGHT: &str = "Can soar through the sky at will";

fn hero_power_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM hero_powers;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn batman_flight_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteRosterService::sqlite(&conn);

    let hero = service
        .create_hero(&NewHero::new("Bruce", "Batman"))
        .unwrap();
    let power = service
        .create_power(&NewPower::new("Flight", FLIGHT).unwrap())
        .unwrap();

    let (link, graph) = service
        .create_hero_power("Strong", hero.id, power.id)
        .unwrap();
    assert_eq!(link.strength(), Strength::Strong);

    let created = to_payload(
        graph.link(link.id).unwrap(),
        &SerializeOptions::rules(&["-hero_id", "-power_id"]),
    )
    .unwrap();
    assert_eq!(created["hero"]["name"], "Bruce");
    assert_eq!(created["power"]["description"], FLIGHT);

    let hero_graph = service.get_hero_graph(hero.id).unwrap();
    let payload = to_payload(hero_graph.hero(hero.id).unwrap(), &SerializeOptions::default())
        .unwrap();
    let links = payload["hero_powers"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["id"], Value::from(link.id));
    assert_eq!(links[0]["strength"], "Strong");
    assert_eq!(links[0]["power"]["name"], "Flight");
}

#[test]
fn invalid_strength_is_rejected_before_reference_checks() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteRosterService::sqlite(&conn);

    let err = service.create_hero_power("Invincible", 1, 1).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::NotAllowed { .. })
    ));
    assert_eq!(hero_power_count(&conn), 0);
}

#[test]
fn missing_hero_or_power_is_an_invalid_reference() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteRosterService::sqlite(&conn);
    let hero = service
        .create_hero(&NewHero::new("Bruce", "Batman"))
        .unwrap();
    let power = service
        .create_power(&NewPower::new("Flight", FLIGHT).unwrap())
        .unwrap();

    for (hero_id, power_id) in [(hero.id, 999), (999, power.id), (999, 999)] {
        let err = service
            .create_hero_power("Weak", hero_id, power_id)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidReference { .. }));
    }
    assert_eq!(hero_power_count(&conn), 0);
}

#[test]
fn update_power_with_empty_description_keeps_stored_value() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteRosterService::sqlite(&conn);
    let power = service
        .create_power(&NewPower::new("Flight", FLIGHT).unwrap())
        .unwrap();

    let err = service
        .update_power(
            power.id,
            PowerUpdate {
                description: Some(String::new()),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::Empty { .. })
    ));
    assert_eq!(service.get_power(power.id).unwrap().description(), FLIGHT);
}

#[test]
fn update_power_returns_stored_result() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteRosterService::sqlite(&conn);
    let power = service
        .create_power(&NewPower::new("Flight", FLIGHT).unwrap())
        .unwrap();

    let updated = service
        .update_power(
            power.id,
            PowerUpdate {
                description: Some("Rides thermals for hours without rest".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.description(), "Rides thermals for hours without rest");
    assert_eq!(updated.name, "Flight");
}

#[test]
fn not_found_errors_name_the_entity() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteRosterService::sqlite(&conn);

    assert!(matches!(
        service.get_hero_graph(5),
        Err(ServiceError::HeroNotFound(5))
    ));
    assert!(matches!(
        service.get_power(6),
        Err(ServiceError::PowerNotFound(6))
    ));
    assert!(matches!(
        service.update_power(6, PowerUpdate::default()),
        Err(ServiceError::PowerNotFound(6))
    ));
    assert!(matches!(
        service.delete_hero(5),
        Err(ServiceError::HeroNotFound(5))
    ));
    assert!(matches!(
        service.delete_power(6),
        Err(ServiceError::PowerNotFound(6))
    ));
}

#[test]
fn power_graph_lists_linked_heroes() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteRosterService::sqlite(&conn);
    let power = service
        .create_power(&NewPower::new("Flight", FLIGHT).unwrap())
        .unwrap();
    for (name, super_name) in [("Carol", "Captain Marvel"), ("Ororo", "Storm")] {
        let hero = service
            .create_hero(&NewHero::new(name, super_name))
            .unwrap();
        service
            .create_hero_power("Average", hero.id, power.id)
            .unwrap();
    }

    let graph = service.get_power_graph(power.id).unwrap();
    let payload = to_payload(graph.power(power.id).unwrap(), &SerializeOptions::default())
        .unwrap();
    let names: Vec<&str> = payload["hero_powers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["hero"]["super_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Captain Marvel", "Storm"]);
}
