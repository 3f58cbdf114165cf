use proptest::prelude::*;


pub(crate) fn simple_number_strategy() -> impl Strategy<Value = String> {
    (0u32..=1000).prop_map(|n| n.to_string())
}

pub(crate) fn simple_dice_strategy() -> impl Strategy<Value = String> {
    (prop::option::of(1u16..=100), 1u16..=1000)
        .prop_map(|(count, sides)| match count {
            Some(count) => format!("{count}d{sides}"),
            None => format!("d{sides}")
        })
}

pub(crate) fn modifier_text_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("reroll lowest"),
            Just("reroll highest"),
            Just("reroll less than"),
            Just("reroll greater than"),
            Just("minimum value"),
            Just("maximum value"),
            Just("drop lowest"),
            Just("drop highest"),
        ],
        0u32..=10,
        any::<bool>()
    ).prop_map(|(phrase, n, shout)| {
        let text = format!("{phrase} {n}");
        if shout { text.to_uppercase() } else { text }
    })
}

pub(crate) fn grouped_dice_strategy() -> impl Strategy<Value = String> {
    (1u16..=100, 1u16..=1000, prop::collection::vec(modifier_text_strategy(), 0..4))
        .prop_map(|(count, sides, modifiers)| {
            let mut text = format!("({count}d{sides}");
            for modifier in modifiers {
                text.push_str(", ");
                text.push_str(&modifier);
            }
            text.push(')');
            text
        })
}

pub(crate) fn term_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        simple_number_strategy(),
        simple_dice_strategy(),
        grouped_dice_strategy(),
    ]
}

/// Terms joined by ` + ` or ` - `, optionally with a leading sign.
pub(crate) fn expression_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(prop_oneof![Just("+"), Just("-")]),
        term_strategy(),
        prop::collection::vec((prop_oneof![Just(" + "), Just(" - ")], term_strategy()), 0..6)
    ).prop_map(|(lead, first, rest)| {
        let mut expr = lead.unwrap_or("").to_string();
        expr.push_str(&first);
        for (op, term) in rest {
            expr.push_str(op);
            expr.push_str(&term);
        }
        expr
    })
}
