//! Cart item identity
//!
//! Two cart entries are "the same thing" when they share a product and the
//! exact same modifier selection. Selection order never matters: groups and
//! the options inside them are compared as sets.
//!
//! - `compute_identity_key`: content-addressed key stamped on new entries
//! - `same_item`: structural comparison used by the cart store

use sha2::{Digest, Sha256};
use shared::cart::{CartItemInput, CartLineItem, ProductId, SelectedModifier};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical modifier selection: group name -> selected option names
///
/// Groups without any selected option carry no information and are
/// dropped, so `[]`, a missing list and `[{Size: []}]` all mean
/// "no modifiers". Repeated groups are merged.
type CanonicalModifiers<'a> = BTreeMap<&'a str, BTreeSet<&'a str>>;

fn canonical_modifiers(modifiers: &[SelectedModifier]) -> CanonicalModifiers<'_> {
    let mut groups: CanonicalModifiers<'_> = BTreeMap::new();
    for group in modifiers.iter().filter(|g| !g.options.is_empty()) {
        groups
            .entry(group.modifier_name.as_str())
            .or_default()
            .extend(group.options.iter().map(|o| o.option_name.as_str()));
    }
    groups
}

/// Generate a content-addressed identity key
///
/// The key hashes the product id and the canonical modifier selection
/// (groups sorted by name, options sorted by name). Every field is length
/// prefixed so names containing separators cannot collide. Option prices
/// are not part of identity.
pub fn compute_identity_key(base_id: &ProductId, selected_modifiers: &[SelectedModifier]) -> String {
    let mut hasher = Sha256::new();
    hash_field(&mut hasher, base_id.as_str());

    let groups = canonical_modifiers(selected_modifiers);
    hasher.update((groups.len() as u64).to_le_bytes());
    for (name, options) in &groups {
        hash_field(&mut hasher, name);
        hasher.update((options.len() as u64).to_le_bytes());
        for option in options {
            hash_field(&mut hasher, option);
        }
    }

    let result = hasher.finalize();
    hex::encode(&result[..16])
}

fn hash_field(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Whether a stored entry and a candidate are the same cart entry
pub fn same_item(a: &CartLineItem, b: &CartItemInput) -> bool {
    a.base_id == b.base_id
        && canonical_modifiers(&a.selected_modifiers) == canonical_modifiers(&b.selected_modifiers)
}
