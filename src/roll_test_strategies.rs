use proptest::prelude::*;
use crate::roll::{DiceGroup, DiceLimits, Modifier};


pub(crate) fn modifier_strategy(max_operand: u32) -> impl Strategy<Value = Modifier> {
    (0..=max_operand, 0u8..8).prop_map(|(n, kind)| {
        match kind {
            0 => Modifier::RerollLowest(n),
            1 => Modifier::RerollHighest(n),
            2 => Modifier::RerollLessThan(n),
            3 => Modifier::RerollGreaterThan(n),
            4 => Modifier::MinValue(n),
            5 => Modifier::MaxValue(n),
            6 => Modifier::DropLowest(n),
            _ => Modifier::DropHighest(n),
        }
    })
}

pub(crate) fn dice_group_strategy() -> impl Strategy<Value = DiceGroup> {
    (1..=100u32, 1..=20u32)
        .prop_flat_map(|(sides, count)| {
            prop::collection::vec(modifier_strategy(sides + 2), 0..4).prop_map(move |modifiers| {
                DiceGroup::builder(sides)
                    .count(count)
                    .modifiers(modifiers)
                    .grouped(true)
                    .build(&DiceLimits::default())
                    .unwrap()
            })
        })
}

pub(crate) fn values_strategy() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(1..=1000u16, 1..40)
}
