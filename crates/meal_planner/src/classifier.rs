//! Keyword based breakfast / lunch / dinner classification and slot
//! assignment for a chosen meal triple.

use crate::types::{DetailedMeal, MealSlot};

/// Title keywords per slot. Matching is a case-insensitive substring test and
/// the sets are consulted breakfast first, then lunch, then dinner.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotKeywords {
    pub breakfast: Vec<String>,
    pub lunch: Vec<String>,
    pub dinner: Vec<String>,
}

impl Default for SlotKeywords {
    fn default() -> Self {
        let owned = |words: &[&str]| -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        };
        Self {
            breakfast: owned(&[
                "pancake", "oat", "egg", "toast", "smoothie", "cereal", "muffin", "yogurt",
            ]),
            lunch: owned(&["sandwich", "wrap", "burger", "salad", "soup"]),
            dinner: owned(&["steak", "roast", "curry", "biryani", "pasta", "grill"]),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SlotClassifier {
    sets: [(MealSlot, Vec<String>); 3],
}

impl Default for SlotClassifier {
    fn default() -> Self {
        Self::new(SlotKeywords::default())
    }
}

impl SlotClassifier {
    pub fn new(keywords: SlotKeywords) -> Self {
        let lower = |words: Vec<String>| -> Vec<String> {
            words
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            sets: [
                (MealSlot::Breakfast, lower(keywords.breakfast)),
                (MealSlot::Lunch, lower(keywords.lunch)),
                (MealSlot::Dinner, lower(keywords.dinner)),
            ],
        }
    }

    pub fn classify_title(&self, title: &str) -> MealSlot {
        let title = title.to_lowercase();
        self.sets
            .iter()
            .find(|(_, words)| words.iter().any(|w| title.contains(w.as_str())))
            .map(|(slot, _)| *slot)
            .unwrap_or(MealSlot::Unspecified)
    }

    pub fn classify(&self, meal: &DetailedMeal) -> MealSlot {
        self.classify_title(&meal.title)
    }

    /// Place each meal of `combo` into a daily slot and tag it.
    ///
    /// 1. Meals go to their classified slot while it is free; duplicates and
    ///    unspecified meals overflow, in encounter order.
    /// 2. Empty slots take the overflow meal at the slot's own position
    ///    (breakfast 0, lunch 1, dinner 2), if there is one.
    /// 3. Slots still empty take the first combo meal not yet placed.
    ///
    /// Output is ordered breakfast, lunch, dinner; a slot is only missing
    /// when the combo has fewer than three meals.
    pub fn assign(&self, combo: &[DetailedMeal]) -> Vec<DetailedMeal> {
        let mut slots: [Option<usize>; 3] = [None; 3];
        let mut unassigned: Vec<usize> = Vec::new();

        for (idx, meal) in combo.iter().enumerate() {
            match MealSlot::DAILY.iter().position(|s| *s == self.classify(meal)) {
                Some(pos) if slots[pos].is_none() => slots[pos] = Some(idx),
                _ => unassigned.push(idx),
            }
        }

        for (pos, slot) in slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = unassigned.get(pos).copied();
            }
        }

        for pos in 0..slots.len() {
            if slots[pos].is_none() {
                let next = (0..combo.len()).find(|idx| !slots.contains(&Some(*idx)));
                slots[pos] = next;
            }
        }

        MealSlot::DAILY
            .iter()
            .zip(slots)
            .filter_map(|(slot, idx)| idx.map(|i| combo[i].tagged(*slot)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NutrientProfile;

    fn meal(id: u64, title: &str) -> DetailedMeal {
        DetailedMeal {
            id,
            title: title.to_string(),
            image: None,
            source_url: None,
            ready_in_minutes: None,
            servings: None,
            ingredients: vec![],
            nutrition: NutrientProfile::default(),
            instructions: String::new(),
            meal_type: None,
            status: None,
        }
    }

    fn placement(out: &[DetailedMeal]) -> Vec<(MealSlot, u64)> {
        out.iter()
            .map(|m| (m.meal_type.expect("tagged"), m.id))
            .collect()
    }

    fn assert_complete(out: &[DetailedMeal]) {
        assert_eq!(out.len(), 3);
        let slots: Vec<MealSlot> = out.iter().map(|m| m.meal_type.expect("tagged")).collect();
        assert_eq!(slots, MealSlot::DAILY.to_vec());
        let mut ids: Vec<u64> = out.iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3, "a meal was placed twice");
    }

    #[test]
    fn classify_by_keyword() {
        let c = SlotClassifier::default();
        assert_eq!(c.classify_title("Banana Oat Smoothie"), MealSlot::Breakfast);
        assert_eq!(c.classify_title("Grilled Chicken Sandwich"), MealSlot::Lunch);
        assert_eq!(c.classify_title("Beef Biryani"), MealSlot::Dinner);
        assert_eq!(c.classify_title("Fruit Platter"), MealSlot::Unspecified);
    }

    #[test]
    fn breakfast_keywords_win_over_lunch() {
        let c = SlotClassifier::default();
        assert_eq!(c.classify_title("Egg Salad Sandwich"), MealSlot::Breakfast);
        assert_eq!(c.classify_title("STEAK SALAD"), MealSlot::Lunch);
    }

    #[test]
    fn distinct_slots_are_kept() {
        let c = SlotClassifier::default();
        let out = c.assign(&[
            meal(1, "Chicken Curry"),
            meal(2, "Yogurt Parfait"),
            meal(3, "Tomato Soup"),
        ]);
        assert_eq!(
            placement(&out),
            vec![
                (MealSlot::Breakfast, 2),
                (MealSlot::Lunch, 3),
                (MealSlot::Dinner, 1)
            ]
        );
    }

    #[test]
    fn overflow_fills_by_position() {
        // All three classify as breakfast: the first takes breakfast, the
        // overflow list is [2, 3]; lunch takes overflow[1], dinner has no
        // overflow[2] and falls back to the first unplaced meal.
        let c = SlotClassifier::default();
        let out = c.assign(&[
            meal(1, "Pancake Stack"),
            meal(2, "Egg Muffin"),
            meal(3, "Overnight Oats"),
        ]);
        assert_eq!(
            placement(&out),
            vec![
                (MealSlot::Breakfast, 1),
                (MealSlot::Lunch, 3),
                (MealSlot::Dinner, 2)
            ]
        );
    }

    #[test]
    fn unspecified_meals_overflow() {
        let c = SlotClassifier::default();
        let out = c.assign(&[
            meal(1, "Fruit Platter"),
            meal(2, "Beef Stew"),
            meal(3, "Roast Chicken"),
        ]);
        // unassigned = [1, 2]; breakfast <- 1, lunch <- 2
        assert_eq!(
            placement(&out),
            vec![
                (MealSlot::Breakfast, 1),
                (MealSlot::Lunch, 2),
                (MealSlot::Dinner, 3)
            ]
        );
    }

    #[test]
    fn positional_overflow_never_places_a_meal_twice() {
        // breakfast is filled, unassigned = [1, 3]; lunch takes unassigned[1]
        // which is meal 3, dinner finds no unassigned[2] and takes meal 1.
        let c = SlotClassifier::default();
        let out = c.assign(&[
            meal(1, "Mystery Dish"),
            meal(2, "French Toast"),
            meal(3, "Plain Rice"),
        ]);
        assert_complete(&out);
        assert_eq!(
            placement(&out),
            vec![
                (MealSlot::Breakfast, 2),
                (MealSlot::Lunch, 3),
                (MealSlot::Dinner, 1)
            ]
        );
    }

    #[test]
    fn every_three_meal_combo_fills_all_slots() {
        let c = SlotClassifier::default();
        let titles = ["Oat Bowl", "Club Sandwich", "Steak Frites", "Fruit Platter"];
        for a in titles {
            for b in titles {
                for d in titles {
                    let out = c.assign(&[meal(1, a), meal(2, b), meal(3, d)]);
                    assert_complete(&out);
                }
            }
        }
    }

    #[test]
    fn short_combo_leaves_slots_empty() {
        let c = SlotClassifier::default();
        let out = c.assign(&[meal(1, "Steak"), meal(2, "Steak")]);
        assert_eq!(
            placement(&out),
            vec![(MealSlot::Breakfast, 2), (MealSlot::Dinner, 1)]
        );
    }

    #[test]
    fn custom_keywords_are_honoured() {
        let c = SlotClassifier::new(SlotKeywords {
            breakfast: vec!["Congee".into()],
            lunch: vec![],
            dinner: vec!["hotpot".into()],
        });
        assert_eq!(c.classify_title("Chicken congee"), MealSlot::Breakfast);
        assert_eq!(c.classify_title("Spicy Hotpot"), MealSlot::Dinner);
        assert_eq!(c.classify_title("Pancakes"), MealSlot::Unspecified);
    }
}
