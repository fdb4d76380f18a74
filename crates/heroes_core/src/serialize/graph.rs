//! In-memory entity graph used as serialization input.
//!
//! # Responsibility
//! - Hold the heroes, powers and links loaded for one response.
//! - Resolve relationships between them in both directions.
//!
//! # Invariants
//! - Relationships only resolve to entities present in the graph; a link
//!   whose endpoint was not loaded renders that side as `null`.
//! - The graph is cyclic by construction (hero -> link -> hero), so
//!   traversal must be bounded by exclusion rules or a depth limit.

use super::SerializeError;
use crate::model::{Hero, HeroId, HeroPower, HeroPowerId, Power, PowerId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Loaded entities keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    heroes: BTreeMap<HeroId, Hero>,
    powers: BTreeMap<PowerId, Power>,
    links: BTreeMap<HeroPowerId, HeroPower>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph of one hero, its links and the powers they point to.
    pub fn for_hero(hero: Hero, links: Vec<(HeroPower, Power)>) -> Self {
        let mut graph = Self::new();
        graph.insert_hero(hero);
        for (link, power) in links {
            graph.insert_link(link);
            graph.insert_power(power);
        }
        graph
    }

    /// Graph of one power, its links and the heroes they point to.
    pub fn for_power(power: Power, links: Vec<(HeroPower, Hero)>) -> Self {
        let mut graph = Self::new();
        graph.insert_power(power);
        for (link, hero) in links {
            graph.insert_link(link);
            graph.insert_hero(hero);
        }
        graph
    }

    /// Graph of one link with both endpoints.
    pub fn for_link(link: HeroPower, hero: Hero, power: Power) -> Self {
        let mut graph = Self::new();
        graph.insert_hero(hero);
        graph.insert_power(power);
        graph.insert_link(link);
        graph
    }

    /// Graph of unrelated heroes, used for list payloads.
    pub fn from_heroes(heroes: impl IntoIterator<Item = Hero>) -> Self {
        let mut graph = Self::new();
        for hero in heroes {
            graph.insert_hero(hero);
        }
        graph
    }

    /// Graph of unrelated powers, used for list payloads.
    pub fn from_powers(powers: impl IntoIterator<Item = Power>) -> Self {
        let mut graph = Self::new();
        for power in powers {
            graph.insert_power(power);
        }
        graph
    }

    pub fn insert_hero(&mut self, hero: Hero) {
        self.heroes.insert(hero.id, hero);
    }

    pub fn insert_power(&mut self, power: Power) {
        self.powers.insert(power.id, power);
    }

    pub fn insert_link(&mut self, link: HeroPower) {
        self.links.insert(link.id, link);
    }

    pub fn hero(&self, id: HeroId) -> Option<Node<'_>> {
        self.heroes.get(&id).map(|hero| Node {
            graph: self,
            entity: Entity::Hero(hero),
        })
    }

    pub fn power(&self, id: PowerId) -> Option<Node<'_>> {
        self.powers.get(&id).map(|power| Node {
            graph: self,
            entity: Entity::Power(power),
        })
    }

    pub fn link(&self, id: HeroPowerId) -> Option<Node<'_>> {
        self.links.get(&id).map(|link| Node {
            graph: self,
            entity: Entity::Link(link),
        })
    }

    /// Heroes in id order.
    pub fn heroes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.heroes.values().map(move |hero| Node {
            graph: self,
            entity: Entity::Hero(hero),
        })
    }

    /// Powers in id order.
    pub fn powers(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.powers.values().map(move |power| Node {
            graph: self,
            entity: Entity::Power(power),
        })
    }

    fn links_where(&self, predicate: impl Fn(&HeroPower) -> bool) -> Vec<Node<'_>> {
        self.links
            .values()
            .filter(|link| predicate(link))
            .map(|link| Node {
                graph: self,
                entity: Entity::Link(link),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Entity<'g> {
    Hero(&'g Hero),
    Power(&'g Power),
    Link(&'g HeroPower),
}

/// One entity inside a [`Graph`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'g> {
    graph: &'g Graph,
    entity: Entity<'g>,
}

/// Value of a relationship attribute.
#[derive(Debug)]
pub enum Relation<'g> {
    One(Option<Node<'g>>),
    Many(Vec<Node<'g>>),
}

impl<'g> Node<'g> {
    /// Entity name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self.entity {
            Entity::Hero(_) => "hero",
            Entity::Power(_) => "power",
            Entity::Link(_) => "hero_power",
        }
    }

    /// Exclusion rules declared by the entity type itself.
    pub fn entity_rules(&self) -> &'static [&'static str] {
        match self.entity {
            Entity::Hero(_) => &["-hero_powers.hero"],
            Entity::Power(_) => &["-hero_powers.power"],
            Entity::Link(_) => &["-hero.hero_powers", "-power.hero_powers"],
        }
    }

    /// Scalar columns, encoded from the model's `Serialize` impl.
    pub fn columns(&self) -> Result<Map<String, Value>, SerializeError> {
        let encoded = match self.entity {
            Entity::Hero(hero) => serde_json::to_value(hero),
            Entity::Power(power) => serde_json::to_value(power),
            Entity::Link(link) => serde_json::to_value(link),
        }
        .map_err(|err| SerializeError::Encode {
            entity: self.kind(),
            reason: err.to_string(),
        })?;

        match encoded {
            Value::Object(columns) => Ok(columns),
            other => Err(SerializeError::Encode {
                entity: self.kind(),
                reason: format!("expected an object, got `{other}`"),
            }),
        }
    }

    /// Relationship attributes resolved against the owning graph.
    pub fn relations(&self) -> Vec<(&'static str, Relation<'g>)> {
        let graph = self.graph;
        match self.entity {
            Entity::Hero(hero) => vec![(
                "hero_powers",
                Relation::Many(graph.links_where(|link| link.hero_id == hero.id)),
            )],
            Entity::Power(power) => vec![(
                "hero_powers",
                Relation::Many(graph.links_where(|link| link.power_id == power.id)),
            )],
            Entity::Link(link) => vec![
                ("hero", Relation::One(graph.hero(link.hero_id))),
                ("power", Relation::One(graph.power(link.power_id))),
            ],
        }
    }
}
