// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Name index over the zones of a topology object.
//!
//! Zones refer to their parent by name. Consumers that need to walk the zone
//! forest build a [`ZoneIndex`] on demand instead of the schema holding
//! structural links. The index borrows the zones and never modifies them.
//!
//! When two zones share a name the first one in document order wins; the
//! validator reports the duplicate.

use std::collections::{HashMap, HashSet};

use crate::v1alpha1::{ResourceInfo, Zone};

#[derive(Debug, Clone)]
pub struct ZoneIndex<'a> {
    zones: &'a [Zone],
    by_name: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ZoneIndex<'a> {
    pub fn new(zones: &'a [Zone]) -> Self {
        let mut by_name = HashMap::with_capacity(zones.len());
        let mut children: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (position, zone) in zones.iter().enumerate() {
            by_name.entry(zone.name.as_str()).or_insert(position);
            if let Some(parent) = zone.parent_name() {
                children.entry(parent).or_default().push(position);
            }
        }

        Self {
            zones,
            by_name,
            children,
        }
    }

    /// Number of distinct zone names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'a Zone> {
        self.by_name.get(name).map(|&i| &self.zones[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All zones in document order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &'a Zone> + 'a {
        self.zones.iter()
    }

    /// The zone's parent, if it has one and the parent exists.
    pub fn parent_of(&self, name: &str) -> Option<&'a Zone> {
        self.get(name)
            .and_then(Zone::parent_name)
            .and_then(|parent| self.get(parent))
    }

    /// Zones naming `name` as their parent, in document order.
    pub fn children_of(&self, name: &str) -> impl Iterator<Item = &'a Zone> + '_ {
        let zones = self.zones;
        self.children
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&i| &zones[i])
    }

    /// Zones without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &'a Zone> + 'a {
        self.zones.iter().filter(|z| z.is_root())
    }

    /// Zones whose parent does not resolve to any zone.
    pub fn orphans(&self) -> impl Iterator<Item = &'a Zone> + '_ {
        self.zones
            .iter()
            .filter(move |z| z.parent_name().is_some_and(|p| !self.contains(p)))
    }

    pub fn zones_of_type<'s>(&'s self, zone_type: &'s str) -> impl Iterator<Item = &'a Zone> + 's {
        self.zones.iter().filter(move |z| z.zone_type == zone_type)
    }

    /// Walk from the zone's parent up to its root.
    ///
    /// Stops at a dangling parent reference or when a zone repeats.
    pub fn ancestors(&self, name: &str) -> Ancestors<'a, '_> {
        let mut seen = HashSet::new();
        let start = self.get(name);
        if let Some(zone) = start {
            seen.insert(zone.name.as_str());
        }
        Ancestors {
            index: self,
            current: start,
            seen,
            cycle: false,
        }
    }

    /// Number of ancestors of the zone, or `None` if it is unknown or sits on
    /// a parent cycle.
    pub fn depth(&self, name: &str) -> Option<usize> {
        self.get(name)?;
        let mut ancestors = self.ancestors(name);
        let depth = ancestors.by_ref().count();
        (!ancestors.hit_cycle()).then_some(depth)
    }

    /// Whether following parents from `name` ever returns to a zone already
    /// visited.
    pub fn in_cycle(&self, name: &str) -> bool {
        let mut ancestors = self.ancestors(name);
        ancestors.by_ref().for_each(drop);
        ancestors.hit_cycle()
    }

    /// Cost recorded on zone `from` towards zone `to`.
    pub fn cost(&self, from: &str, to: &str) -> Option<i64> {
        self.get(from).and_then(|zone| zone.cost_to(to))
    }

    /// A resource of the named zone.
    pub fn resource(&self, zone: &str, resource: &str) -> Option<&'a ResourceInfo> {
        self.get(zone).and_then(|z| z.resource(resource))
    }

    /// The zone of the given type that contains `name` (or is `name` itself).
    pub fn enclosing(&self, name: &str, zone_type: &str) -> Option<&'a Zone> {
        let zone = self.get(name)?;
        if zone.zone_type == zone_type {
            return Some(zone);
        }
        self.ancestors(name).find(|z| z.zone_type == zone_type)
    }
}

/// Iterator returned by [`ZoneIndex::ancestors`].
pub struct Ancestors<'a, 'i> {
    index: &'i ZoneIndex<'a>,
    current: Option<&'a Zone>,
    seen: HashSet<&'a str>,
    cycle: bool,
}

impl Ancestors<'_, '_> {
    /// True once the walk has stopped because a zone repeated.
    pub fn hit_cycle(&self) -> bool {
        self.cycle
    }
}

impl<'a> Iterator for Ancestors<'a, '_> {
    type Item = &'a Zone;

    fn next(&mut self) -> Option<Self::Item> {
        let parent_name = self.current?.parent_name()?;
        let parent = self.index.get(parent_name);
        self.current = parent;
        let parent = parent?;
        if !self.seen.insert(parent.name.as_str()) {
            self.cycle = true;
            self.current = None;
            return None;
        }
        Some(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v1alpha1::{ResourceInfo, ZoneType};

    fn zones() -> Vec<Zone> {
        vec![
            Zone::new("node0", ZoneType::NODE)
                .with_cost("node0", 10)
                .with_cost("node1", 21)
                .with_resource(ResourceInfo::parse("cpu", "4", "4", "2").unwrap()),
            Zone::new("node1", ZoneType::NODE).with_cost("node0", 21),
            Zone::new("socket0", ZoneType::SOCKET).with_parent("node0"),
            Zone::new("core0", ZoneType::CORE).with_parent("socket0"),
            Zone::new("core1", ZoneType::CORE).with_parent("socket0"),
            Zone::new("stray", ZoneType::CORE).with_parent("missing"),
        ]
    }

    #[test]
    fn test_lookup_and_navigation() {
        let zones = zones();
        let index = ZoneIndex::new(&zones);

        assert_eq!(index.len(), 6);
        assert!(index.contains("core1"));
        assert_eq!(index.parent_of("core0").unwrap().name, "socket0");
        assert!(index.parent_of("node0").is_none());
        assert!(index.parent_of("stray").is_none());

        let children: Vec<_> = index.children_of("socket0").map(|z| z.name.as_str()).collect();
        assert_eq!(children, vec!["core0", "core1"]);
        assert_eq!(index.children_of("core0").count(), 0);

        let roots: Vec<_> = index.roots().map(|z| z.name.as_str()).collect();
        assert_eq!(roots, vec!["node0", "node1"]);

        let orphans: Vec<_> = index.orphans().map(|z| z.name.as_str()).collect();
        assert_eq!(orphans, vec!["stray"]);

        assert_eq!(index.zones_of_type(ZoneType::CORE).count(), 3);
    }

    #[test]
    fn test_ancestors_and_depth() {
        let zones = zones();
        let index = ZoneIndex::new(&zones);

        let path: Vec<_> = index.ancestors("core1").map(|z| z.name.as_str()).collect();
        assert_eq!(path, vec!["socket0", "node0"]);
        assert_eq!(index.depth("core1"), Some(2));
        assert_eq!(index.depth("node0"), Some(0));
        assert_eq!(index.depth("stray"), Some(0));
        assert_eq!(index.depth("nope"), None);

        assert_eq!(index.enclosing("core1", ZoneType::NODE).unwrap().name, "node0");
        assert_eq!(index.enclosing("socket0", ZoneType::SOCKET).unwrap().name, "socket0");
        assert!(index.enclosing("node1", ZoneType::SOCKET).is_none());
    }

    #[test]
    fn test_cycle_terminates() {
        let zones = vec![
            Zone::new("a", "X").with_parent("b"),
            Zone::new("b", "X").with_parent("c"),
            Zone::new("c", "X").with_parent("a"),
            Zone::new("self", "X").with_parent("self"),
        ];
        let index = ZoneIndex::new(&zones);

        let path: Vec<_> = index.ancestors("a").map(|z| z.name.as_str()).collect();
        assert_eq!(path, vec!["b", "c"]);
        assert!(index.in_cycle("a"));
        assert!(index.in_cycle("self"));
        assert_eq!(index.depth("a"), None);
        assert!(!ZoneIndex::new(&self::zones()).in_cycle("core0"));
    }

    #[test]
    fn test_costs_and_resources() {
        let zones = zones();
        let index = ZoneIndex::new(&zones);

        assert_eq!(index.cost("node0", "node1"), Some(21));
        assert_eq!(index.cost("node1", "node0"), Some(21));
        assert_eq!(index.cost("node1", "node1"), None);
        assert_eq!(
            index.resource("node0", "cpu").unwrap().available,
            "2".parse::<crate::quantity::Quantity>().unwrap()
        );
        assert!(index.resource("node1", "cpu").is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let zones = vec![
            Zone::new("dup", ZoneType::NODE),
            Zone::new("dup", ZoneType::SOCKET),
        ];
        let index = ZoneIndex::new(&zones);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("dup").unwrap().zone_type, ZoneType::NODE);
        assert_eq!(index.iter().count(), 2);
    }
}
