//! Variable environment.
//!
//! Grounded on `Calculator<T>`'s constructor, which seeds `vars_` with
//! `Pi`, `Ga`, `E` and `ans` before any input is read. The original's
//! constants are kept verbatim even though `Pi` and `E` are not the
//! mathematical constants they're named after (spec.md §9: preserved on
//! purpose, not "fixed"). Each slot is a [`SharedNum`], so a variable
//! read shares the stored value with the evaluator's stack instead of
//! copying it, matching `ShrdNum<T>`'s role as `Calculator<T>`'s operand
//! storage; `set`/`slot_mut` detach before writing so a value already
//! shared onto the stack doesn't change out from under it.

use std::collections::HashMap;

use crate::bigdec::BigDec;
use crate::shared::SharedNum;

pub struct Environment {
    vars: HashMap<String, SharedNum<BigDec>>,
}

impl Environment {
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        vars.insert("Pi".to_string(), SharedNum::new("3.14".parse::<BigDec>().unwrap()));
        vars.insert("Ga".to_string(), SharedNum::new("9.81".parse::<BigDec>().unwrap()));
        vars.insert("E".to_string(), SharedNum::new("2.41".parse::<BigDec>().unwrap()));
        vars.insert("ans".to_string(), SharedNum::new(BigDec::zero()));
        Environment { vars }
    }

    /// Alias for [`Environment::new`], named to match the "preloaded
    /// variables are seeded by `Environment::with_defaults()`" wording
    /// used elsewhere in this crate's design notes.
    pub fn with_defaults() -> Self {
        Environment::new()
    }

    /// Scratch read: a cloned (shared, not copied) handle to the
    /// variable's value, or `None` if the name has never been bound.
    /// Mirrors `Calculator.hpp`'s `get_scratch_p()`, which throws
    /// `exInvalidVar` on an unbound read; callers turn `None` into
    /// [`crate::error::Error::InvalidVariable`].
    pub fn get(&self, name: &str) -> Option<SharedNum<BigDec>> {
        self.vars.get(name).cloned()
    }

    /// Assignment-target slot: creates the variable (at zero) if unseen,
    /// returning a shared handle to it. Mirrors `Calculator.hpp`'s
    /// `get_ass_p()`, which never fails — an assignment can always
    /// introduce a new name.
    pub fn slot_mut(&mut self, name: &str) -> SharedNum<BigDec> {
        self.vars
            .entry(name.to_string())
            .or_insert_with(|| SharedNum::new(BigDec::zero()))
            .clone()
    }

    /// Rebinds `name` to `value`, detaching first so any handle already
    /// shared onto the evaluator's stack keeps seeing the pre-assignment
    /// value instead of being mutated out from under it.
    pub fn set(&mut self, name: &str, value: BigDec) {
        let slot = self.vars.entry(name.to_string()).or_insert_with(|| SharedNum::new(BigDec::zero()));
        slot.detach();
        slot.set(value);
    }

    pub fn set_ans(&mut self, value: BigDec) {
        self.set("ans", value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preloaded_constants() {
        let env = Environment::new();
        assert_eq!(env.get("Pi").unwrap().to_string(), "3.14");
        assert_eq!(env.get("Ga").unwrap().to_string(), "9.81");
        assert_eq!(env.get("E").unwrap().to_string(), "2.41");
        assert_eq!(env.get("ans").unwrap().to_string(), "0");
    }

    #[test]
    fn unseen_variable_scratch_read_is_none() {
        let env = Environment::new();
        assert!(env.get("x").is_none());
    }

    #[test]
    fn assignment_target_creates_unseen_variable_at_zero() {
        let mut env = Environment::new();
        assert_eq!(env.slot_mut("x").get().to_string(), "0");
        assert!(env.get("x").is_some());
    }

    #[test]
    fn set_does_not_mutate_a_handle_shared_before_the_write() {
        let mut env = Environment::new();
        let before = env.get("ans").unwrap();
        env.set_ans(BigDec::from_i64(7));
        assert_eq!(before.get().to_string(), "0");
        assert_eq!(env.get("ans").unwrap().get().to_string(), "7");
    }
}
