//! Deserialisation types for the catalogue API resources.
//!
//! Only the fields the extractor reads are modelled; everything else in the
//! upstream payloads is ignored. Optional upstream values default rather than
//! fail so a sparse resource still yields a record.

use serde::Deserialize;

/// A `{ name, url }` reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NamedResource {
    /// Upstream slug.
    pub name: String,
    /// Absolute URL of the referenced resource.
    pub url: String,
}

impl NamedResource {
    /// Build a reference from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A reference that carries only a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResourceLink {
    /// Absolute URL of the referenced resource.
    pub url: String,
}

/// One page of the index listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct IndexPage {
    /// Entries in upstream order.
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// Base detail for one creature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PokemonResource {
    /// Numeric identifier.
    pub id: u32,
    /// Lowercase slug.
    pub name: String,
    /// Height in decimetres.
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms.
    #[serde(default)]
    pub weight: u32,
    /// Experience yield; upstream sends `null` for some forms.
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Type slots.
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Ability slots.
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    /// Base stats.
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    /// Learnable moves with per-version details.
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
    /// Sprite URLs.
    #[serde(default)]
    pub sprites: SpriteSet,
    /// Species reference.
    pub species: NamedResource,
    /// URL of the location encounter listing.
    #[serde(default)]
    pub location_area_encounters: String,
}

/// A type assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TypeSlot {
    /// Display order, starting at 1.
    #[serde(default)]
    pub slot: u8,
    /// The type itself.
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// An ability assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AbilitySlot {
    /// The ability itself.
    pub ability: NamedResource,
    /// Whether this is the hidden ability.
    #[serde(default)]
    pub is_hidden: bool,
}

/// A base stat value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatEntry {
    /// Base value.
    pub base_stat: u32,
    /// Stat reference.
    pub stat: NamedResource,
}

/// A learnable move.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MoveEntry {
    /// Move reference.
    #[serde(rename = "move")]
    pub entry: NamedResource,
    /// How the move is learned in each version group.
    #[serde(default)]
    pub version_group_details: Vec<VersionGroupDetail>,
}

/// How a move is learned in one version group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VersionGroupDetail {
    /// Level at which the move is learned; zero when not level-based.
    #[serde(default)]
    pub level_learned_at: u32,
    /// Learn method reference.
    pub move_learn_method: NamedResource,
}

/// Sprite URLs for one creature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SpriteSet {
    /// Default front sprite.
    #[serde(default)]
    pub front_default: Option<String>,
    /// Shiny front sprite.
    #[serde(default)]
    pub front_shiny: Option<String>,
    /// Alternative artwork sets.
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

impl SpriteSet {
    /// Official artwork, if upstream provides it.
    #[must_use]
    pub fn official_artwork(&self) -> Option<&str> {
        self.other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|artwork| artwork.front_default.as_deref())
    }
}

/// Alternative artwork sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct OtherSprites {
    /// Official artwork.
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

/// A single artwork entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Artwork {
    /// Front-facing image.
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Species detail for one creature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SpeciesResource {
    /// Evolution chain reference.
    #[serde(default)]
    pub evolution_chain: Option<ResourceLink>,
    /// Generation that introduced the species.
    #[serde(default)]
    pub generation: Option<NamedResource>,
    /// Natural habitat.
    #[serde(default)]
    pub habitat: Option<NamedResource>,
    /// Legendary flag.
    #[serde(default)]
    pub is_legendary: bool,
    /// Mythical flag.
    #[serde(default)]
    pub is_mythical: bool,
    /// Localised flavor text entries.
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

/// One localised flavor text entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct FlavorTextEntry {
    /// Raw text, possibly containing control characters.
    pub flavor_text: String,
    /// Language reference.
    pub language: NamedResource,
}

/// Evolution chain detail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EvolutionChainResource {
    /// Root of the chain tree.
    pub chain: ChainLink,
}

/// One node of the evolution chain tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ChainLink {
    /// Species at this node.
    #[serde(default)]
    pub species: Option<NamedResource>,
    /// Direct evolutions in upstream order.
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// One location encounter entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EncounterResource {
    /// Location area reference.
    pub location_area: NamedResource,
}
