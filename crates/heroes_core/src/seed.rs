//! Sample roster for local development.
//!
//! # Responsibility
//! - Reset the three roster tables.
//! - Insert a fixed set of heroes, powers and links.
//!
//! # Invariants
//! - Seeding runs in one transaction; a failure leaves the previous data.
//! - Content is deterministic; only row ids advance between runs.

use crate::model::{NewHero, NewHeroPower, NewPower, Strength};
use crate::repo::hero_power_repo::{HeroPowerRepository, SqliteHeroPowerRepository};
use crate::repo::hero_repo::{HeroRepository, SqliteHeroRepository};
use crate::repo::power_repo::{PowerRepository, SqlitePowerRepository};
use crate::repo::RepoResult;
use log::info;
use rusqlite::{Connection, TransactionBehavior};

const HEROES: &[(&str, &str)] = &[
    ("Kamala Khan", "Ms. Marvel"),
    ("Doreen Green", "Squirrel Girl"),
    ("Gwen Stacy", "Spider-Gwen"),
    ("Janet Van Dyne", "The Wasp"),
    ("Wanda Maximoff", "Scarlet Witch"),
    ("Carol Danvers", "Captain Marvel"),
    ("Jean Grey", "Dark Phoenix"),
    ("Ororo Munroe", "Storm"),
    ("Kitty Pryde", "Shadowcat"),
    ("Elektra Natchios", "Elektra"),
];

const POWERS: &[(&str, &str)] = &[
    ("super strength", "gives the wielder super-human strengths"),
    (
        "flight",
        "gives the wielder the ability to fly through the skies at supersonic speed",
    ),
    (
        "super human senses",
        "allows the wielder to use her senses at a super-human level",
    ),
    (
        "elasticity",
        "can stretch the human body to extreme lengths",
    ),
];

/// Row counts written by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub heroes: usize,
    pub powers: usize,
    pub hero_powers: usize,
}

/// Replaces all roster data with the sample set.
pub fn seed_sample_data(conn: &mut Connection) -> RepoResult<SeedSummary> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(
        "DELETE FROM hero_powers;
         DELETE FROM heroes;
         DELETE FROM powers;",
    )?;

    let hero_repo = SqliteHeroRepository::new(&tx);
    let power_repo = SqlitePowerRepository::new(&tx);
    let link_repo = SqliteHeroPowerRepository::new(&tx);

    let mut hero_ids = Vec::with_capacity(HEROES.len());
    for (name, super_name) in HEROES {
        hero_ids.push(hero_repo.create_hero(&NewHero::new(*name, *super_name))?.id);
    }

    let mut power_ids = Vec::with_capacity(POWERS.len());
    for (name, description) in POWERS {
        power_ids.push(power_repo.create_power(&NewPower::new(*name, *description)?)?.id);
    }

    let strengths = [Strength::Strong, Strength::Average, Strength::Weak];
    let mut links = 0;
    for (index, hero_id) in hero_ids.iter().enumerate() {
        let power_count = 1 + index % 3;
        for offset in 0..power_count.min(power_ids.len()) {
            link_repo.create_hero_power(&NewHeroPower {
                strength: strengths[(index + offset) % strengths.len()],
                hero_id: *hero_id,
                power_id: power_ids[(index + offset) % power_ids.len()],
            })?;
            links += 1;
        }
    }

    tx.commit()?;

    let summary = SeedSummary {
        heroes: hero_ids.len(),
        powers: power_ids.len(),
        hero_powers: links,
    };
    info!(
        "event=seed module=core status=ok heroes={} powers={} hero_powers={}",
        summary.heroes, summary.powers, summary.hero_powers
    );
    Ok(summary)
}
