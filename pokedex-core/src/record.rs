//! The creature record and its derived views.
//!
//! A [`Record`] is produced once by the ingestion pipeline and never mutated
//! afterwards. Everything a presentation layer needs beyond the stored fields
//! (total stats, humanized names, stage grouping, move slices) is derived here
//! so that every consumer computes it the same way.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Learn method marking a move as learnt by levelling up.
pub const LEVEL_UP_METHOD: &str = "level-up";

/// One creature's full profile.
///
/// # Examples
///
/// ```
/// use pokedex_core::{Record, Stat};
///
/// let record = Record {
///     id: 25,
///     name: "pikachu".to_owned(),
///     types: vec!["electric".to_owned()],
///     stats: vec![
///         Stat::new("hp", 35),
///         Stat::new("attack", 55),
///     ],
///     ..Record::default()
/// };
/// assert_eq!(record.total_stats(), 90);
/// assert_eq!(record.primary_type(), Some("electric"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Record {
    /// Unique, stable identifier and natural sort key.
    pub id: u32,
    /// Upstream lowercase slug, e.g. `mr-mime`.
    pub name: String,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    /// Experience yielded when defeated.
    pub base_experience: u32,
    /// One or two element types; the first is the primary type.
    pub types: Vec<String>,
    /// Abilities in upstream slot order.
    pub abilities: Vec<Ability>,
    /// Base stats in upstream order.
    pub stats: Vec<Stat>,
    /// Level-up moves (ascending level) followed by other moves.
    pub moves: Vec<Move>,
    /// Preferred artwork URI.
    pub image: Option<String>,
    /// Fallback sprite URIs.
    pub sprites: Sprites,
    /// Generation tag such as `generation-i`.
    pub generation: Option<String>,
    /// Habitat slug, when the species has one.
    pub habitat: Option<String>,
    /// Legendary flag from the species data.
    pub is_legendary: bool,
    /// Mythical flag from the species data.
    pub is_mythical: bool,
    /// Single-line flavour text, empty when upstream has none.
    pub flavor_text: String,
    /// Flattened evolution chain in traversal order.
    pub evolution_chain: Vec<EvolutionNode>,
    /// Humanized encounter areas, at most twelve.
    pub locations: Vec<String>,
}

/// An ability a creature may have.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ability {
    /// Ability slug.
    pub name: String,
    /// Whether this is the hidden ability.
    pub is_hidden: bool,
}

impl Ability {
    /// Construct an ability.
    pub fn new(name: impl Into<String>, is_hidden: bool) -> Self {
        Self {
            name: name.into(),
            is_hidden,
        }
    }
}

/// A named base stat.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stat {
    /// Stat name, e.g. `special-attack`.
    pub name: String,
    /// Base value.
    pub value: u32,
}

impl Stat {
    /// Construct a stat.
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A learnable move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    /// Move slug.
    pub name: String,
    /// Upstream learn method, e.g. `level-up` or `machine`.
    pub learn_method: String,
    /// Level at which the move is learnt, for level-up moves.
    pub level: Option<u32>,
}

impl Move {
    /// Construct a move.
    pub fn new(name: impl Into<String>, learn_method: impl Into<String>, level: Option<u32>) -> Self {
        Self {
            name: name.into(),
            learn_method: learn_method.into(),
            level,
        }
    }

    /// Whether the move is learnt by levelling up.
    pub fn is_level_up(&self) -> bool {
        self.level.is_some() && self.learn_method == LEVEL_UP_METHOD
    }
}

/// Alternate sprite URIs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sprites {
    /// Default front sprite.
    pub front_default: Option<String>,
    /// Shiny front sprite.
    pub front_shiny: Option<String>,
}

/// One entry in a flattened evolution chain.
///
/// Nodes with no upstream species reference keep `id: None` and an empty
/// name rather than being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvolutionNode {
    /// Species identifier parsed from the upstream reference.
    pub id: Option<u32>,
    /// Species slug.
    pub name: String,
    /// Zero-based depth; `0` is the base form.
    pub stage: u32,
}

impl EvolutionNode {
    /// Construct an evolution node.
    pub fn new(id: Option<u32>, name: impl Into<String>, stage: u32) -> Self {
        Self {
            id,
            name: name.into(),
            stage,
        }
    }
}

impl Record {
    /// Sum of every base stat.
    ///
    /// Sorting and presentation both use this value; never recompute it
    /// elsewhere.
    pub fn total_stats(&self) -> u32 {
        self.stats
            .iter()
            .fold(0_u32, |total, stat| total.saturating_add(stat.value))
    }

    /// Human-readable name, e.g. `Mr Mime` for `mr-mime`.
    pub fn display_name(&self) -> String {
        humanize(&self.name)
    }

    /// The primary (first) type, used for accent colouring.
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Whether the record carries `type_name` among its types.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|candidate| candidate == type_name)
    }

    /// Look up a base stat by name.
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
    }

    /// Moves learnt by levelling up, in ascending level order.
    pub fn level_up_moves(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter(|entry| entry.is_level_up())
    }

    /// Moves learnt any other way, in first-encountered order.
    pub fn other_moves(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter().filter(|entry| !entry.is_level_up())
    }

    /// Group the evolution chain into stages.
    ///
    /// The outer vector is indexed by stage; nodes inside a stage keep their
    /// traversal order. Stages with no nodes are omitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use pokedex_core::{EvolutionNode, Record};
    ///
    /// let record = Record {
    ///     evolution_chain: vec![
    ///         EvolutionNode::new(Some(133), "eevee", 0),
    ///         EvolutionNode::new(Some(134), "vaporeon", 1),
    ///         EvolutionNode::new(Some(135), "jolteon", 1),
    ///     ],
    ///     ..Record::default()
    /// };
    /// let stages = record.evolution_stages();
    /// assert_eq!(stages.len(), 2);
    /// assert_eq!(stages.get(1).map(Vec::len), Some(2));
    /// ```
    pub fn evolution_stages(&self) -> Vec<Vec<&EvolutionNode>> {
        let mut depths: Vec<u32> = self.evolution_chain.iter().map(|node| node.stage).collect();
        depths.sort_unstable();
        depths.dedup();
        depths
            .into_iter()
            .map(|depth| {
                self.evolution_chain
                    .iter()
                    .filter(|node| node.stage == depth)
                    .collect()
            })
            .collect()
    }
}

/// Turn an upstream slug into a display string.
///
/// Hyphens become spaces and each word is capitalised.
///
/// # Examples
///
/// ```
/// use pokedex_core::humanize;
///
/// assert_eq!(humanize("viridian-forest-area"), "Viridian Forest Area");
/// assert_eq!(humanize("mr-mime"), "Mr Mime");
/// ```
pub fn humanize(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(capitalise)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
