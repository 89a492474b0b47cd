//! Record builders shared by unit and behaviour tests.

use crate::{Record, Stat};

/// A record carrying only an id and a name.
pub fn named(id: u32, name: &str) -> Record {
    Record {
        id,
        name: name.to_owned(),
        ..Record::default()
    }
}

/// A record whose stats sum to `total`.
pub fn with_total(id: u32, total: u32) -> Record {
    Record {
        stats: vec![Stat::new("hp", total)],
        ..named(id, &format!("specimen-{id}"))
    }
}
