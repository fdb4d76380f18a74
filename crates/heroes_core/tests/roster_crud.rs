use heroes_core::db::open_db_in_memory;
use heroes_core::repo::hero_power_repo::{HeroPowerRepository, SqliteHeroPowerRepository};
use heroes_core::repo::hero_repo::{HeroRepository, SqliteHeroRepository};
use heroes_core::repo::power_repo::{PowerRepository, SqlitePowerRepository};
use heroes_core::{NewHero, NewHeroPower, NewPower, RepoError, Strength};
use rusqlite::params;

const FLIGHT: &str = "Can soar through the sky at will";

#[test]
fn create_and_get_hero_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHeroRepository::new(&conn);

    let created = repo.create_hero(&NewHero::new("Bruce", "Batman")).unwrap();
    let loaded = repo.get_hero(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.super_name, "Batman");
}

#[test]
fn get_missing_rows_returns_none() {
    let conn = open_db_in_memory().unwrap();
    assert!(SqliteHeroRepository::new(&conn).get_hero(42).unwrap().is_none());
    assert!(SqlitePowerRepository::new(&conn).get_power(42).unwrap().is_none());
    assert!(SqliteHeroPowerRepository::new(&conn)
        .get_hero_power(42)
        .unwrap()
        .is_none());
}

#[test]
fn list_heroes_is_ordered_by_id_and_allows_duplicate_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHeroRepository::new(&conn);

    let first = repo.create_hero(&NewHero::new("Bruce", "Batman")).unwrap();
    let second = repo.create_hero(&NewHero::new("Bruce", "Hulk")).unwrap();

    let heroes = repo.list_heroes().unwrap();
    assert_eq!(
        heroes.iter().map(|hero| hero.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
}

#[test]
fn power_description_roundtrips_exactly() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePowerRepository::new(&conn);

    let description = "  untrimmed text with  spaces  ";
    let created = repo
        .create_power(&NewPower::new("odd", description).unwrap())
        .unwrap();
    let loaded = repo.get_power(created.id).unwrap().unwrap();
    assert_eq!(loaded.description(), description);
}

#[test]
fn update_power_persists_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePowerRepository::new(&conn);

    let mut power = repo
        .create_power(&NewPower::new("flight", FLIGHT).unwrap())
        .unwrap();
    power
        .set_description("Glides gracefully between rooftops")
        .unwrap();
    repo.update_power(&power).unwrap();

    let loaded = repo.get_power(power.id).unwrap().unwrap();
    assert_eq!(loaded.description(), "Glides gracefully between rooftops");
}

#[test]
fn update_and_delete_missing_power_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePowerRepository::new(&conn);

    let orphan = NewPower::new("ghost", FLIGHT).unwrap().into_power(77);
    assert!(matches!(
        repo.update_power(&orphan),
        Err(RepoError::NotFound { entity: "power", id: 77 })
    ));
    assert!(matches!(
        repo.delete_power(77),
        Err(RepoError::NotFound { entity: "power", id: 77 })
    ));
    assert!(matches!(
        SqliteHeroRepository::new(&conn).delete_hero(77),
        Err(RepoError::NotFound { entity: "hero", id: 77 })
    ));
}

#[test]
fn invalid_persisted_description_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    // Bypass the CHECK constraint the same way a legacy database would.
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "INSERT INTO powers (name, description) VALUES (?1, ?2);",
        params!["legacy", "short"],
    )
    .unwrap();

    let err = SqlitePowerRepository::new(&conn).list_powers().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("description")));
}

#[test]
fn links_load_with_far_side_entities() {
    let conn = open_db_in_memory().unwrap();
    let heroes = SqliteHeroRepository::new(&conn);
    let powers = SqlitePowerRepository::new(&conn);
    let links = SqliteHeroPowerRepository::new(&conn);

    let hero = heroes.create_hero(&NewHero::new("Bruce", "Batman")).unwrap();
    let power = powers
        .create_power(&NewPower::new("flight", FLIGHT).unwrap())
        .unwrap();
    let link = links
        .create_hero_power(&NewHeroPower {
            strength: Strength::Average,
            hero_id: hero.id,
            power_id: power.id,
        })
        .unwrap();

    let for_hero = links.list_for_hero(hero.id).unwrap();
    assert_eq!(for_hero, vec![(link.clone(), power.clone())]);

    let for_power = links.list_for_power(power.id).unwrap();
    assert_eq!(for_power, vec![(link.clone(), hero)]);

    let loaded = links.get_hero_power(link.id).unwrap().unwrap();
    assert_eq!(loaded.strength(), Strength::Average);
}

#[test]
fn link_insert_requires_existing_parents() {
    let conn = open_db_in_memory().unwrap();
    let err = SqliteHeroPowerRepository::new(&conn)
        .create_hero_power(&NewHeroPower {
            strength: Strength::Weak,
            hero_id: 1,
            power_id: 1,
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn deleting_parents_cascades_to_links() {
    let conn = open_db_in_memory().unwrap();
    let heroes = SqliteHeroRepository::new(&conn);
    let powers = SqlitePowerRepository::new(&conn);
    let links = SqliteHeroPowerRepository::new(&conn);

    let hero = heroes.create_hero(&NewHero::new("Bruce", "Batman")).unwrap();
    let other = heroes.create_hero(&NewHero::new("Clark", "Superman")).unwrap();
    let power = powers
        .create_power(&NewPower::new("flight", FLIGHT).unwrap())
        .unwrap();
    for hero_id in [hero.id, other.id] {
        links
            .create_hero_power(&NewHeroPower {
                strength: Strength::Strong,
                hero_id,
                power_id: power.id,
            })
            .unwrap();
    }

    heroes.delete_hero(hero.id).unwrap();
    assert_eq!(link_count(&conn), 1);

    powers.delete_power(power.id).unwrap();
    assert_eq!(link_count(&conn), 0);
    assert!(heroes.get_hero(other.id).unwrap().is_some());
}

#[test]
fn invalid_persisted_strength_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let hero = SqliteHeroRepository::new(&conn)
        .create_hero(&NewHero::new("Bruce", "Batman"))
        .unwrap();
    let power = SqlitePowerRepository::new(&conn)
        .create_power(&NewPower::new("flight", FLIGHT).unwrap())
        .unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "INSERT INTO hero_powers (strength, hero_id, power_id) VALUES ('Mighty', ?1, ?2);",
        params![hero.id, power.id],
    )
    .unwrap();

    let err = SqliteHeroPowerRepository::new(&conn)
        .list_for_hero(hero.id)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("Mighty")));
}

fn link_count(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM hero_powers;", [], |row| row.get(0))
        .unwrap()
}
