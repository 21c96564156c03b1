//! Overlay elements per slot and which jewelry is currently worn.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::domain::jewelry_item::{JewelryItem, JewelryKind};
use crate::placement::domain::overlay_placement::{OverlayPlacement, OverlaySlot, SlotUpdate};

/// Visual handle for one slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OverlayElement {
    pub item_id: Option<String>,
    pub image_path: Option<String>,
    pub placement: Option<OverlayPlacement>,
    pub visible: bool,
}

impl OverlayElement {
    fn hide(&mut self) {
        self.visible = false;
    }

    fn bind(&mut self, item: &JewelryItem) {
        self.item_id = Some(item.id.clone());
        self.image_path = Some(item.image_path.clone());
    }
}

/// Flattened view of one visible overlay, for reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedOverlay {
    pub slot: OverlaySlot,
    pub item_id: Option<String>,
    pub image_path: Option<String>,
    #[serde(flatten)]
    pub placement: OverlayPlacement,
}

#[derive(Clone, Debug, Default)]
pub struct OverlayRegistry {
    elements: BTreeMap<OverlaySlot, OverlayElement>,
    active: BTreeMap<JewelryKind, String>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `item` the active jewelry of its kind.
    ///
    /// Earrings rebind both ear slots to the new image and hide them until
    /// the next placement. A new necklace replaces the previous one in the
    /// necklace slot and stays visible if a placement already exists. Hand
    /// jewelry rebinds every slot of its kind. Other kinds are untouched.
    pub fn select(&mut self, item: &JewelryItem) {
        match item.kind {
            JewelryKind::Earrings => {
                for slot in OverlaySlot::EARRINGS {
                    let el = self.element_mut(slot);
                    el.hide();
                    el.bind(item);
                }
            }
            JewelryKind::Necklace => {
                let el = self.element_mut(OverlaySlot::Necklace);
                el.hide();
                el.bind(item);
                el.visible = el.placement.is_some();
            }
            JewelryKind::Bangle => {
                for slot in OverlaySlot::BANGLES {
                    self.element_mut(slot).bind(item);
                }
            }
            JewelryKind::Ring => {
                for slot in OverlaySlot::RINGS {
                    self.element_mut(slot).bind(item);
                }
            }
        }
        self.active.insert(item.kind, item.id.clone());
    }

    /// Removes every element belonging to `kind` and forgets it as active.
    pub fn remove_kind(&mut self, kind: JewelryKind) {
        for slot in slots_of(kind) {
            self.elements.remove(slot);
        }
        self.active.remove(&kind);
    }

    /// Binds `item` to `slot` and shows it at `placement` in one step.
    pub fn insert(&mut self, slot: OverlaySlot, item: &JewelryItem, placement: OverlayPlacement) {
        let el = self.element_mut(slot);
        el.bind(item);
        el.placement = Some(placement);
        el.visible = true;
        self.active.insert(item.kind, item.id.clone());
    }

    pub fn apply(&mut self, slot: OverlaySlot, update: SlotUpdate) {
        match update {
            SlotUpdate::Show(placement) => {
                let el = self.element_mut(slot);
                el.placement = Some(placement);
                el.visible = true;
            }
            SlotUpdate::Hide => {
                if let Some(el) = self.elements.get_mut(&slot) {
                    el.hide();
                }
            }
            SlotUpdate::Keep => {}
        }
    }

    pub fn hide_hand_overlays(&mut self) {
        for (_, el) in self.elements.iter_mut().filter(|(slot, _)| slot.is_hand_slot()) {
            el.hide();
        }
    }

    pub fn hide_all(&mut self) {
        for el in self.elements.values_mut() {
            el.hide();
        }
    }

    /// Drops every element and every active selection.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.active.clear();
    }

    pub fn active(&self, kind: JewelryKind) -> Option<&str> {
        self.active.get(&kind).map(String::as_str)
    }

    pub fn face_tracking_needed(&self) -> bool {
        self.active.contains_key(&JewelryKind::Earrings)
            || self.active.contains_key(&JewelryKind::Necklace)
    }

    pub fn hand_tracking_needed(&self) -> bool {
        self.active.keys().any(|kind| kind.is_hand_worn())
    }

    pub fn is_tracking_needed(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn get(&self, slot: OverlaySlot) -> Option<&OverlayElement> {
        self.elements.get(&slot)
    }

    pub fn is_visible(&self, slot: OverlaySlot) -> bool {
        self.elements.get(&slot).is_some_and(|el| el.visible)
    }

    /// Visible overlays with a placement, in slot order.
    pub fn visible_placements(&self) -> Vec<PlacedOverlay> {
        self.elements
            .iter()
            .filter(|(_, el)| el.visible)
            .filter_map(|(slot, el)| {
                el.placement.map(|placement| PlacedOverlay {
                    slot: *slot,
                    item_id: el.item_id.clone(),
                    image_path: el.image_path.clone(),
                    placement,
                })
            })
            .collect()
    }

    fn element_mut(&mut self, slot: OverlaySlot) -> &mut OverlayElement {
        self.elements.entry(slot).or_default()
    }
}

/// Slots an item of `kind` occupies.
pub fn slots_of(kind: JewelryKind) -> &'static [OverlaySlot] {
    match kind {
        JewelryKind::Earrings => &OverlaySlot::EARRINGS,
        JewelryKind::Necklace => &[OverlaySlot::Necklace],
        JewelryKind::Bangle => &OverlaySlot::BANGLES,
        JewelryKind::Ring => &OverlaySlot::RINGS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::domain::overlay_placement::Finger;

    fn ear(id: &str) -> JewelryItem {
        JewelryItem::new(id, &format!("public/jwellery/{id}.png"), JewelryKind::Earrings)
    }

    fn necklace(id: &str) -> JewelryItem {
        JewelryItem::new(id, &format!("public/jwellery/{id}.png"), JewelryKind::Necklace)
    }

    fn at(x: f64) -> SlotUpdate {
        SlotUpdate::Show(OverlayPlacement::rect(x, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_earring_variant_switch_rebinds_both_and_leaves_necklace() {
        let mut reg = OverlayRegistry::new();
        reg.select(&necklace("necklace1"));
        reg.apply(OverlaySlot::Necklace, at(5.0));
        reg.select(&ear("ear1"));
        for slot in OverlaySlot::EARRINGS {
            reg.apply(slot, at(1.0));
        }

        reg.select(&ear("ear2"));

        for slot in OverlaySlot::EARRINGS {
            let el = reg.get(slot).unwrap();
            assert_eq!(el.image_path.as_deref(), Some("public/jwellery/ear2.png"));
            assert!(!el.visible);
        }
        assert!(reg.is_visible(OverlaySlot::Necklace));
        assert_eq!(reg.active(JewelryKind::Earrings), Some("ear2"));
    }

    #[test]
    fn test_selecting_necklace_leaves_earring_visibility() {
        let mut reg = OverlayRegistry::new();
        reg.select(&ear("ear1"));
        reg.apply(OverlaySlot::LeftEarring, at(1.0));
        reg.apply(OverlaySlot::RightEarring, SlotUpdate::Hide);

        reg.select(&necklace("necklace2"));

        assert!(reg.is_visible(OverlaySlot::LeftEarring));
        assert!(!reg.is_visible(OverlaySlot::RightEarring));
    }

    #[test]
    fn test_necklace_switch_keeps_single_necklace() {
        let mut reg = OverlayRegistry::new();
        reg.select(&necklace("necklace1"));
        assert!(!reg.is_visible(OverlaySlot::Necklace));
        reg.apply(OverlaySlot::Necklace, at(5.0));

        reg.select(&necklace("necklace2"));

        let el = reg.get(OverlaySlot::Necklace).unwrap();
        assert_eq!(el.item_id.as_deref(), Some("necklace2"));
        assert!(el.visible);
        let necklaces = reg
            .visible_placements()
            .into_iter()
            .filter(|p| p.slot == OverlaySlot::Necklace)
            .count();
        assert_eq!(necklaces, 1);
    }

    #[test]
    fn test_keep_leaves_previous_state() {
        let mut reg = OverlayRegistry::new();
        reg.select(&necklace("necklace1"));
        reg.apply(OverlaySlot::Necklace, at(5.0));
        let before = reg.get(OverlaySlot::Necklace).cloned();
        reg.apply(OverlaySlot::Necklace, SlotUpdate::Keep);
        assert_eq!(reg.get(OverlaySlot::Necklace).cloned(), before);
    }

    #[test]
    fn test_tracking_needed() {
        let mut reg = OverlayRegistry::new();
        assert!(!reg.is_tracking_needed());
        reg.select(&JewelryItem::new("ring1", "r.png", JewelryKind::Ring));
        assert!(reg.is_tracking_needed());
        assert!(reg.hand_tracking_needed());
        assert!(!reg.face_tracking_needed());
        reg.select(&ear("ear1"));
        assert!(reg.face_tracking_needed());
    }

    #[test]
    fn test_hide_hand_overlays_only_touches_hand_slots() {
        let mut reg = OverlayRegistry::new();
        reg.select(&necklace("necklace1"));
        reg.apply(OverlaySlot::Necklace, at(5.0));
        reg.select(&JewelryItem::new("ring1", "r.png", JewelryKind::Ring));
        reg.apply(OverlaySlot::Ring(Finger::Middle), at(3.0));

        reg.hide_hand_overlays();

        assert!(!reg.is_visible(OverlaySlot::Ring(Finger::Middle)));
        assert!(reg.is_visible(OverlaySlot::Necklace));
    }

    #[test]
    fn test_remove_kind_and_insert() {
        let mut reg = OverlayRegistry::new();
        let item = ear("ear1");
        reg.insert(OverlaySlot::LeftEarring, &item, OverlayPlacement::rect(0.0, 0.0, 5.0, 5.0));
        reg.insert(OverlaySlot::RightEarring, &item, OverlayPlacement::rect(9.0, 0.0, 5.0, 5.0));
        assert_eq!(reg.visible_placements().len(), 2);

        reg.remove_kind(JewelryKind::Earrings);

        assert!(reg.visible_placements().is_empty());
        assert_eq!(reg.active(JewelryKind::Earrings), None);
    }

    #[test]
    fn test_hide_all_keeps_bindings() {
        let mut reg = OverlayRegistry::new();
        reg.select(&ear("ear1"));
        reg.apply(OverlaySlot::LeftEarring, at(1.0));
        reg.hide_all();
        let el = reg.get(OverlaySlot::LeftEarring).unwrap();
        assert!(!el.visible);
        assert_eq!(el.item_id.as_deref(), Some("ear1"));
    }
}
