use std::cmp::Reverse;

use crate::models::{Category, WardrobeItem};

/// Smallest and largest number of items an outfit may contain
pub const MIN_OUTFIT_ITEMS: usize = 2;
pub const MAX_OUTFIT_ITEMS: usize = 5;

/// Wardrobe items grouped by the slot they fill in an outfit
///
/// Each slot is ordered most recently added first, so that enumeration
/// (and therefore sampling) is deterministic for a given snapshot.
#[derive(Debug, Default)]
pub struct Slots<'a> {
    pub tops: Vec<&'a WardrobeItem>,
    pub bottoms: Vec<&'a WardrobeItem>,
    pub dresses: Vec<&'a WardrobeItem>,
    pub outerwear: Vec<&'a WardrobeItem>,
    pub shoes: Vec<&'a WardrobeItem>,
    pub accessories: Vec<&'a WardrobeItem>,
    /// Items left out because they cannot be placed in any slot
    pub skipped: usize,
}

impl<'a> Slots<'a> {
    /// Sorts items into slots, skipping malformed ones
    pub fn partition(items: &'a [WardrobeItem]) -> Self {
        let mut slots = Slots::default();

        for item in items {
            let slot = match item.category {
                _ if !item.is_usable() => None,
                Category::Top => Some(&mut slots.tops),
                Category::Bottom => Some(&mut slots.bottoms),
                Category::Dress => Some(&mut slots.dresses),
                Category::Outerwear => Some(&mut slots.outerwear),
                Category::Shoes => Some(&mut slots.shoes),
                Category::Accessory => Some(&mut slots.accessories),
                Category::Unknown => None,
            };

            match slot {
                Some(slot) => slot.push(item),
                None => {
                    tracing::warn!(
                        item_id = %item.id,
                        category = %item.category,
                        color = %item.color,
                        "Skipping wardrobe item that cannot be placed in an outfit"
                    );
                    slots.skipped += 1;
                }
            }
        }

        for slot in [
            &mut slots.tops,
            &mut slots.bottoms,
            &mut slots.dresses,
            &mut slots.outerwear,
            &mut slots.shoes,
            &mut slots.accessories,
        ] {
            slot.sort_by_key(|item| Reverse((item.created_at, item.id)));
        }

        slots
    }
}

/// The mandatory part of an outfit
#[derive(Debug, Clone, Copy)]
enum Base<'a> {
    Separates(&'a WardrobeItem, &'a WardrobeItem),
    Dress(&'a WardrobeItem),
}

/// Mixed-radix view over every outfit a wardrobe can produce
///
/// A combination index decodes to one base, an optional outerwear piece,
/// optional shoes, and a set of up to two accessories. Index zero is always
/// the bare base.
pub struct CombinationSpace<'a> {
    bases: Vec<Base<'a>>,
    outerwear: Vec<Option<&'a WardrobeItem>>,
    shoes: Vec<Option<&'a WardrobeItem>>,
    accessories: Vec<Vec<&'a WardrobeItem>>,
}

impl<'a> CombinationSpace<'a> {
    pub fn new(slots: &Slots<'a>) -> Self {
        let mut bases =
            Vec::with_capacity(slots.tops.len() * slots.bottoms.len() + slots.dresses.len());
        for &top in &slots.tops {
            for &bottom in &slots.bottoms {
                bases.push(Base::Separates(top, bottom));
            }
        }
        bases.extend(slots.dresses.iter().map(|&dress| Base::Dress(dress)));

        let optional = |items: &[&'a WardrobeItem]| -> Vec<Option<&'a WardrobeItem>> {
            std::iter::once(None)
                .chain(items.iter().map(|&item| Some(item)))
                .collect()
        };

        Self {
            bases,
            outerwear: optional(&slots.outerwear),
            shoes: optional(&slots.shoes),
            accessories: accessory_sets(&slots.accessories),
        }
    }

    /// Total number of combinations, before size filtering
    pub fn len(&self) -> u128 {
        self.bases.len() as u128
            * self.outerwear.len() as u128
            * self.shoes.len() as u128
            * self.accessories.len() as u128
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes a combination index into its items, in slot order
    pub fn decode(&self, index: u128) -> Vec<&'a WardrobeItem> {
        let mut rest = index;
        let accessories = &self.accessories[(rest % self.accessories.len() as u128) as usize];
        rest /= self.accessories.len() as u128;
        let shoes = self.shoes[(rest % self.shoes.len() as u128) as usize];
        rest /= self.shoes.len() as u128;
        let outerwear = self.outerwear[(rest % self.outerwear.len() as u128) as usize];
        rest /= self.outerwear.len() as u128;
        let base = self.bases[(rest % self.bases.len() as u128) as usize];

        let mut items = Vec::with_capacity(MAX_OUTFIT_ITEMS + 1);
        match base {
            Base::Separates(top, bottom) => {
                items.push(top);
                items.push(bottom);
            }
            Base::Dress(dress) => items.push(dress),
        }
        items.extend(outerwear);
        items.extend(shoes);
        items.extend(accessories.iter().copied());
        items
    }

    /// Indices to score, at most `cap` of them
    ///
    /// Small spaces are enumerated in full. Larger ones spread the budget
    /// evenly over the bases, and within each base walk the outerwear, shoes
    /// and accessory digits with a stride co-prime to their combined size,
    /// so every option of every optional slot keeps turning up. The result is
    /// sorted and free of duplicates.
    pub fn sample_indices(&self, cap: usize) -> Vec<u128> {
        let total = self.len();
        let cap = cap as u128;

        if total <= cap {
            return (0..total).collect();
        }

        let bases = self.bases.len() as u128;
        let extras = total / bases;
        let stride = coprime_stride(extras);

        let mut indices: Vec<u128> = (0..cap)
            .map(|i| {
                let base = i * bases / cap;
                base * extras + (i * stride) % extras
            })
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Combinations that satisfy the outfit size rules, at most `cap` considered
    pub fn outfits(&self, cap: usize) -> Vec<Vec<&'a WardrobeItem>> {
        if self.is_empty() {
            return Vec::new();
        }

        self.sample_indices(cap)
            .into_iter()
            .map(|index| self.decode(index))
            .filter(|items| (MIN_OUTFIT_ITEMS..=MAX_OUTFIT_ITEMS).contains(&items.len()))
            .collect()
    }
}

/// Step near the golden section of `n` that shares no factor with it
fn coprime_stride(n: u128) -> u128 {
    let mut stride = (n * 618 / 1000).max(1);
    while gcd(stride, n) != 1 {
        stride += 1;
    }
    stride
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Every accessory set of size 0..=2, empty set first
fn accessory_sets<'a>(accessories: &[&'a WardrobeItem]) -> Vec<Vec<&'a WardrobeItem>> {
    let mut sets = vec![Vec::new()];
    for (i, &first) in accessories.iter().enumerate() {
        sets.push(vec![first]);
        for &second in &accessories[i + 1..] {
            sets.push(vec![first, second]);
        }
    }
    sets
}
