//! Static operator and function registries.
//!
//! Grounded on `Calculator.hpp`'s `OpT`/`FnT` tables: every operator and
//! builtin function the evaluator knows about, along with the metadata
//! the shunting-yard parser needs (precedence, associativity, whether an
//! infix operator's left operand must resolve to an assignable variable)
//! without needing the original's `fptr`-dispatched virtual-method
//! tables — here `Evaluator::apply_*` just matches on `id`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub id: &'static str,
    pub prec: u8,
    pub assoc: Assoc,
    /// True for an infix operator whose left operand must be resolved
    /// against the variable table rather than evaluated as a plain
    /// value (`infOpT::eval`'s `get_ass_p()` vs `get_scratch_p()` split).
    pub assigns: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct FnInfo {
    pub id: &'static str,
    /// Fixed arity, or `-1` for variadic (one or more arguments).
    pub arity: i32,
}

pub const PREFIX_OPS: &[OpInfo] = &[
    OpInfo { id: "+", prec: 9, assoc: Assoc::Right, assigns: false },
    OpInfo { id: "-", prec: 9, assoc: Assoc::Right, assigns: false },
    OpInfo { id: "!", prec: 9, assoc: Assoc::Right, assigns: false },
];

pub const POSTFIX_OPS: &[OpInfo] = &[
    OpInfo { id: "!", prec: 10, assoc: Assoc::Left, assigns: false },
];

pub const INFIX_OPS: &[OpInfo] = &[
    OpInfo { id: "=", prec: 1, assoc: Assoc::Right, assigns: true },
    OpInfo { id: "+=", prec: 1, assoc: Assoc::Right, assigns: true },
    OpInfo { id: "-=", prec: 1, assoc: Assoc::Right, assigns: true },
    OpInfo { id: "*=", prec: 1, assoc: Assoc::Right, assigns: true },
    OpInfo { id: "/=", prec: 1, assoc: Assoc::Right, assigns: true },
    OpInfo { id: "||", prec: 2, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "&&", prec: 3, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "==", prec: 4, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "!=", prec: 4, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "<", prec: 5, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "<=", prec: 5, assoc: Assoc::Left, assigns: false },
    OpInfo { id: ">", prec: 5, assoc: Assoc::Left, assigns: false },
    OpInfo { id: ">=", prec: 5, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "+", prec: 6, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "-", prec: 6, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "*", prec: 7, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "/", prec: 7, assoc: Assoc::Left, assigns: false },
    OpInfo { id: "^", prec: 8, assoc: Assoc::Right, assigns: false },
];

pub const FUNCTIONS: &[FnInfo] = &[
    FnInfo { id: "sum2", arity: 2 },
    FnInfo { id: "neg", arity: 1 },
    FnInfo { id: "fact", arity: 1 },
    FnInfo { id: "help", arity: 0 },
    FnInfo { id: "max", arity: -1 },
    FnInfo { id: "min", arity: -1 },
    FnInfo { id: "sum", arity: -1 },
    FnInfo { id: "avg", arity: -1 },
];

pub fn find_prefix(id: &str) -> Option<&'static OpInfo> {
    PREFIX_OPS.iter().find(|o| o.id == id)
}

pub fn find_postfix(id: &str) -> Option<&'static OpInfo> {
    POSTFIX_OPS.iter().find(|o| o.id == id)
}

pub fn find_infix(id: &str) -> Option<&'static OpInfo> {
    INFIX_OPS.iter().find(|o| o.id == id)
}

pub fn find_function(id: &str) -> Option<&'static FnInfo> {
    FUNCTIONS.iter().find(|f| f.id == id)
}

/// Every distinct operator string recognized anywhere. The lexer scans a
/// maximal run of operator characters first and looks the whole run up
/// here, so ordering doesn't affect matching; sorted longest-first only
/// so error messages and tests enumerate them in a stable, readable
/// order. Mirrors `_opchars_init()` building one charset out of all three
/// operator maps.
pub fn operator_strings() -> Vec<&'static str> {
    let unique: std::collections::HashSet<&'static str> = PREFIX_OPS
        .iter()
        .chain(POSTFIX_OPS.iter())
        .chain(INFIX_OPS.iter())
        .map(|o| o.id)
        .collect();
    let mut v: Vec<&'static str> = unique.into_iter().collect();
    v.sort_by_key(|s| std::cmp::Reverse(s.len()));
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_operator_matches_first() {
        let ops = operator_strings();
        let pos_le = ops.iter().position(|s| *s == "<=").unwrap();
        let pos_lt = ops.iter().position(|s| *s == "<").unwrap();
        assert!(pos_le < pos_lt);
    }

    #[test]
    fn assignment_marks_left_operand_as_assignable() {
        assert!(find_infix("=").unwrap().assigns);
        assert!(!find_infix("+").unwrap().assigns);
    }
}
