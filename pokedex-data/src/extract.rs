//! Convert fetched resources into catalogue records.
//!
//! Every function here is pure: the worker pool fetches the four resources
//! for an item and hands them to [`build_record`].

use std::collections::HashSet;

use pokedex_core::{
    Ability, EvolutionNode, LEVEL_UP_METHOD, Move, Record, Sprites, Stat, humanize,
};
use url::Url;

use crate::resources::{
    ChainLink, EncounterResource, EvolutionChainResource, FlavorTextEntry, MoveEntry,
    PokemonResource, SpeciesResource,
};

/// Maximum number of distinct location names kept per record.
pub const MAX_LOCATIONS: usize = 12;
/// Maximum number of level-up moves kept per record.
pub const MAX_LEVEL_UP_MOVES: usize = 30;
/// Maximum number of non-level-up moves kept per record.
pub const MAX_OTHER_MOVES: usize = 20;

const FLAVOR_TEXT_LANGUAGE: &str = "en";

/// The resources fetched for one index entry.
#[derive(Debug, Clone, Default)]
pub struct FetchedItem {
    /// Base detail.
    pub pokemon: PokemonResource,
    /// Species detail.
    pub species: SpeciesResource,
    /// Evolution chain, absent when the species has none.
    pub chain: Option<EvolutionChainResource>,
    /// Location encounters.
    pub encounters: Vec<EncounterResource>,
}

/// Assemble a [`Record`] from the fetched resources.
#[must_use]
pub fn build_record(item: &FetchedItem) -> Record {
    let FetchedItem {
        pokemon,
        species,
        chain,
        encounters,
    } = item;
    Record {
        id: pokemon.id,
        name: pokemon.name.clone(),
        height: pokemon.height,
        weight: pokemon.weight,
        base_experience: pokemon.base_experience.unwrap_or_default(),
        types: ordered_types(pokemon),
        abilities: pokemon
            .abilities
            .iter()
            .map(|slot| Ability::new(slot.ability.name.as_str(), slot.is_hidden))
            .collect(),
        stats: pokemon
            .stats
            .iter()
            .map(|entry| Stat::new(entry.stat.name.as_str(), entry.base_stat))
            .collect(),
        moves: extract_moves(&pokemon.moves),
        image: pokemon
            .sprites
            .official_artwork()
            .map(str::to_owned)
            .or_else(|| pokemon.sprites.front_default.clone()),
        sprites: Sprites {
            front_default: pokemon.sprites.front_default.clone(),
            front_shiny: pokemon.sprites.front_shiny.clone(),
        },
        generation: species.generation.as_ref().map(|g| g.name.clone()),
        habitat: species.habitat.as_ref().map(|h| h.name.clone()),
        is_legendary: species.is_legendary,
        is_mythical: species.is_mythical,
        flavor_text: flavor_text(&species.flavor_text_entries),
        evolution_chain: chain
            .as_ref()
            .map(|resource| evolution_nodes(&resource.chain))
            .unwrap_or_default(),
        locations: location_names(encounters),
    }
}

fn ordered_types(pokemon: &PokemonResource) -> Vec<String> {
    let mut slots: Vec<_> = pokemon.types.iter().collect();
    slots.sort_by_key(|slot| slot.slot);
    slots.into_iter().map(|slot| slot.kind.name.clone()).collect()
}

/// Flatten an evolution tree into nodes in depth-first pre-order.
///
/// Each node's stage is its depth below the root. Children are visited in
/// upstream order. A link without a species yields an anonymous node.
#[must_use]
pub fn evolution_nodes(root: &ChainLink) -> Vec<EvolutionNode> {
    let mut nodes = Vec::new();
    let mut stack = vec![(root, 0_u32)];
    while let Some((link, stage)) = stack.pop() {
        let (id, name) = link.species.as_ref().map_or((None, String::new()), |species| {
            (species_id_from_url(&species.url), species.name.clone())
        });
        nodes.push(EvolutionNode::new(id, name, stage));
        let depth = stage.saturating_add(1);
        stack.extend(link.evolves_to.iter().rev().map(|child| (child, depth)));
    }
    nodes
}

/// Parse the trailing numeric path segment of a resource URL.
///
/// ```
/// use pokedex_data::species_id_from_url;
///
/// assert_eq!(species_id_from_url("https://pokeapi.co/api/v2/pokemon-species/133/"), Some(133));
/// assert_eq!(species_id_from_url("not a url"), None);
/// ```
#[must_use]
pub fn species_id_from_url(url: &str) -> Option<u32> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()?
        .parse()
        .ok()
}

/// Collect distinct humanized area names, stopping at [`MAX_LOCATIONS`].
#[must_use]
pub fn location_names(encounters: &[EncounterResource]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for encounter in encounters {
        let name = humanize(&encounter.location_area.name);
        if seen.insert(name.clone()) {
            names.push(name);
            if names.len() == MAX_LOCATIONS {
                break;
            }
        }
    }
    names
}

/// Split the upstream move list into capped level-up and other moves.
///
/// A move counts as level-up when a level-up version detail gives it a
/// positive level; its level is the smallest such value. Anything else,
/// including a level-up detail stuck at level 0, is an other move. Level-up
/// moves come first, ordered by level, followed by the remaining moves in
/// upstream order.
#[must_use]
pub fn extract_moves(entries: &[MoveEntry]) -> Vec<Move> {
    let mut level_up = Vec::new();
    let mut other = Vec::new();
    for entry in entries {
        let level = entry
            .version_group_details
            .iter()
            .filter(|detail| detail.move_learn_method.name == LEVEL_UP_METHOD)
            .map(|detail| detail.level_learned_at)
            .filter(|level| *level > 0)
            .min();
        if let Some(level) = level {
            level_up.push(Move::new(entry.entry.name.as_str(), LEVEL_UP_METHOD, Some(level)));
        } else if other.len() < MAX_OTHER_MOVES {
            let method = entry
                .version_group_details
                .first()
                .map_or("", |detail| detail.move_learn_method.name.as_str());
            other.push(Move::new(entry.entry.name.as_str(), method, None));
        }
    }
    level_up.sort_by_key(|learned| learned.level);
    level_up.truncate(MAX_LEVEL_UP_MOVES);
    level_up.extend(other);
    level_up
}

/// Pick the first English entry and normalise it to a single line.
#[must_use]
pub fn flavor_text(entries: &[FlavorTextEntry]) -> String {
    entries
        .iter()
        .find(|entry| entry.language.name == FLAVOR_TEXT_LANGUAGE)
        .map(|entry| normalise_flavor_text(&entry.flavor_text))
        .unwrap_or_default()
}

/// Replace layout control characters with spaces and collapse whitespace.
#[must_use]
pub fn normalise_flavor_text(raw: &str) -> String {
    raw.replace(['\u{000C}', '\n', '\u{00AD}'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{NamedResource, VersionGroupDetail};
    use rstest::rstest;

    fn link(name: &str, id: u32, evolves_to: Vec<ChainLink>) -> ChainLink {
        ChainLink {
            species: Some(NamedResource::new(
                name,
                format!("https://example.test/api/v2/pokemon-species/{id}/"),
            )),
            evolves_to,
        }
    }

    fn detail(method: &str, level: u32) -> VersionGroupDetail {
        VersionGroupDetail {
            level_learned_at: level,
            move_learn_method: NamedResource::new(method, "u"),
        }
    }

    fn learnable(name: &str, details: Vec<VersionGroupDetail>) -> MoveEntry {
        MoveEntry {
            entry: NamedResource::new(name, "u"),
            version_group_details: details,
        }
    }

    fn area(name: &str) -> EncounterResource {
        EncounterResource {
            location_area: NamedResource::new(name, "u"),
        }
    }

    #[rstest]
    fn branching_chain_assigns_depth_stages() {
        let root = link("eevee", 133, vec![link("vaporeon", 134, vec![]), link("jolteon", 135, vec![])]);

        let nodes = evolution_nodes(&root);

        let stages: Vec<u32> = nodes.iter().map(|n| n.stage).collect();
        let ids: Vec<Option<u32>> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(stages, [0, 1, 1]);
        assert_eq!(ids, [Some(133), Some(134), Some(135)]);
    }

    #[rstest]
    fn chain_walk_is_pre_order() {
        let root = link(
            "oddish",
            43,
            vec![
                link("gloom", 44, vec![link("vileplume", 45, vec![]), link("bellossom", 182, vec![])]),
                link("unrelated", 999, vec![]),
            ],
        );

        let names: Vec<String> = evolution_nodes(&root).into_iter().map(|n| n.name).collect();

        assert_eq!(names, ["oddish", "gloom", "vileplume", "bellossom", "unrelated"]);
    }

    #[rstest]
    fn missing_species_yields_anonymous_node() {
        let root = ChainLink {
            species: None,
            evolves_to: vec![],
        };

        let nodes = evolution_nodes(&root);

        assert_eq!(nodes, [EvolutionNode::new(None, "", 0)]);
    }

    #[rstest]
    #[case("https://pokeapi.co/api/v2/pokemon-species/25/", Some(25))]
    #[case("https://pokeapi.co/api/v2/pokemon-species/25", Some(25))]
    #[case("https://pokeapi.co/api/v2/pokemon-species/pikachu/", None)]
    #[case("", None)]
    fn parses_trailing_species_id(#[case] url: &str, #[case] expected: Option<u32>) {
        assert_eq!(species_id_from_url(url), expected);
    }

    #[rstest]
    fn locations_are_unique_humanized_and_capped() {
        let mut encounters = vec![area("viridian-forest"), area("viridian-forest")];
        encounters.extend((0..20).map(|n| area(&format!("route-{n}"))));

        let names = location_names(&encounters);

        assert_eq!(names.len(), MAX_LOCATIONS);
        assert_eq!(names.first().map(String::as_str), Some("Viridian Forest"));
        assert_eq!(names.get(1).map(String::as_str), Some("Route 0"));
    }

    #[rstest]
    fn level_up_moves_take_smallest_positive_level_and_sort() {
        let entries = vec![
            learnable("tackle", vec![detail("level-up", 5), detail("level-up", 1)]),
            learnable("growl", vec![detail("level-up", 0), detail("level-up", 3)]),
            learnable("cut", vec![detail("machine", 0)]),
            learnable("vine-whip", vec![detail("machine", 0), detail("level-up", 9)]),
        ];

        let moves = extract_moves(&entries);

        let summary: Vec<(&str, &str, Option<u32>)> = moves
            .iter()
            .map(|m| (m.name.as_str(), m.learn_method.as_str(), m.level))
            .collect();
        assert_eq!(
            summary,
            [
                ("tackle", "level-up", Some(1)),
                ("growl", "level-up", Some(3)),
                ("vine-whip", "level-up", Some(9)),
                ("cut", "machine", None),
            ]
        );
    }

    #[rstest]
    fn move_lists_are_capped() {
        let mut entries: Vec<MoveEntry> = (1..=40)
            .map(|n| learnable(&format!("level-{n}"), vec![detail("level-up", 41 - n)]))
            .collect();
        entries.extend((0..25).map(|n| learnable(&format!("tm-{n}"), vec![detail("machine", 0)])));

        let moves = extract_moves(&entries);

        let level_up = moves.iter().filter(|m| m.is_level_up()).count();
        assert_eq!(level_up, MAX_LEVEL_UP_MOVES);
        assert_eq!(moves.len(), MAX_LEVEL_UP_MOVES + MAX_OTHER_MOVES);
        assert_eq!(moves.first().and_then(|m| m.level), Some(1));
        assert_eq!(moves.last().map(|m| m.name.as_str()), Some("tm-19"));
    }

    #[rstest]
    fn unlevelled_level_up_move_counts_as_other() {
        let mut entries: Vec<MoveEntry> = (0..25)
            .map(|n| learnable(&format!("tm-{n}"), vec![detail("machine", 0)]))
            .collect();
        entries.insert(0, learnable("evo-move", vec![detail("level-up", 0)]));
        entries.push(learnable("tackle", vec![detail("level-up", 1)]));

        let record = Record {
            moves: extract_moves(&entries),
            ..Record::default()
        };

        assert!(record.other_moves().count() <= MAX_OTHER_MOVES);
        assert_eq!(record.level_up_moves().count(), 1);
        let leading: Vec<(&str, Option<u32>)> = record
            .moves
            .iter()
            .take(2)
            .map(|m| (m.name.as_str(), m.level))
            .collect();
        assert_eq!(leading, [("tackle", Some(1)), ("evo-move", None)]);
    }

    #[rstest]
    fn flavor_text_uses_first_english_entry() {
        let entries = vec![
            FlavorTextEntry {
                flavor_text: "Texte".to_owned(),
                language: NamedResource::new("fr", "u"),
            },
            FlavorTextEntry {
                flavor_text: "Spits fire that\nis hot enough\u{000C}to melt\u{00AD}boulders.".to_owned(),
                language: NamedResource::new("en", "u"),
            },
            FlavorTextEntry {
                flavor_text: "Later entry".to_owned(),
                language: NamedResource::new("en", "u"),
            },
        ];

        assert_eq!(
            flavor_text(&entries),
            "Spits fire that is hot enough to melt boulders."
        );
        assert_eq!(flavor_text(&[]), "");
    }

    #[rstest]
    fn builds_record_from_resources() {
        let item = FetchedItem {
            pokemon: serde_json::from_str(
                r#"{
                    "id": 4,
                    "name": "charmander",
                    "height": 6,
                    "weight": 85,
                    "types": [
                        {"slot": 2, "type": {"name": "dragon", "url": "u"}},
                        {"slot": 1, "type": {"name": "fire", "url": "u"}}
                    ],
                    "abilities": [{"ability": {"name": "blaze", "url": "u"}, "is_hidden": false}],
                    "stats": [{"base_stat": 39, "stat": {"name": "hp", "url": "u"}}],
                    "sprites": {"front_default": "front.png", "front_shiny": null},
                    "species": {"name": "charmander", "url": "https://example.test/pokemon-species/4/"}
                }"#,
            )
            .expect("pokemon should decode"),
            species: SpeciesResource {
                generation: Some(NamedResource::new("generation-i", "u")),
                ..SpeciesResource::default()
            },
            chain: None,
            encounters: vec![area("pallet-town")],
        };

        let record = build_record(&item);

        assert_eq!(record.id, 4);
        assert_eq!(record.types, ["fire", "dragon"]);
        assert_eq!(record.base_experience, 0);
        assert_eq!(record.image.as_deref(), Some("front.png"));
        assert_eq!(record.generation.as_deref(), Some("generation-i"));
        assert_eq!(record.locations, ["Pallet Town"]);
        assert!(record.evolution_chain.is_empty());
    }
}
