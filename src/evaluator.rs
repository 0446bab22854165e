//! Shunting-yard parser and postfix evaluator.
//!
//! Grounded on `calculator_parsing.hpp`'s `ReadAndComp`/`_run`: tokens
//! drive a three-state machine (want a value, have a value, want a
//! function's `(`) that builds a postfix (reverse-Polish) token stream,
//! which is then walked against a value stack. Function-call arity is
//! tracked with a counter pushed alongside each `(` rather than via
//! sentinel tokens spliced into the output queue. Each statement is
//! independent: a failure clears the in-progress parse state, reports
//! `Error: ...`, and evaluation continues with the next statement
//! without touching `ans`.

use std::cmp::Ordering;
use std::io::Write;

use crate::bigdec::BigDec;
use crate::env::Environment;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::registry::{self, Assoc, FnInfo, OpInfo};
use crate::shared::SharedNum;
use crate::token::Token;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ParserState {
    WantVal,
    HaveVal,
}

#[derive(Clone, Copy)]
enum OpKind {
    Prefix,
    Infix,
}

#[derive(Clone)]
enum RpnItem {
    Number(BigDec),
    /// A scratch read: resolved against [`Environment::get`], erroring on
    /// an unbound name.
    Var(String),
    /// The left operand of an assigning operator, recognized at parse
    /// time because an assigning operator's left operand is always the
    /// identifier immediately preceding it. Resolved against
    /// [`Environment::slot_mut`], which creates the name at zero if it
    /// has never been bound.
    AssignTarget(String),
    Op(&'static OpInfo, OpKind),
    Postfix(&'static OpInfo),
    Func(&'static FnInfo, usize),
}

enum StackEntry {
    LeftParen { func: Option<&'static FnInfo>, args: usize },
    Op(&'static OpInfo, OpKind),
}

/// Builds the postfix token stream for one statement's worth of tokens
/// (no terminator token included).
fn to_postfix(tokens: &[Token]) -> Result<Vec<RpnItem>, Error> {
    let mut output: Vec<RpnItem> = Vec::new();
    let mut ops: Vec<StackEntry> = Vec::new();
    let mut state = ParserState::WantVal;
    let mut i = 0;

    fn pop_higher_prec(output: &mut Vec<RpnItem>, ops: &mut Vec<StackEntry>, prec: u8, assoc: Assoc) {
        while let Some(StackEntry::Op(top, _)) = ops.last() {
            let should_pop = match assoc {
                Assoc::Left => top.prec >= prec,
                Assoc::Right => top.prec > prec,
            };
            if !should_pop {
                break;
            }
            if let Some(StackEntry::Op(info, kind)) = ops.pop() {
                output.push(RpnItem::Op(info, kind));
            }
        }
    }

    while i < tokens.len() {
        match &tokens[i] {
            Token::Number(n) => {
                if state != ParserState::WantVal {
                    return Err(Error::InvalidToken(format!("unexpected number {n}")));
                }
                output.push(RpnItem::Number(n.clone()));
                state = ParserState::HaveVal;
                i += 1;
            }
            Token::Ident(name) => {
                if state != ParserState::WantVal {
                    return Err(Error::InvalidToken(format!("unexpected identifier {name}")));
                }
                if matches!(tokens.get(i + 1), Some(Token::LeftParen)) {
                    let finfo = registry::find_function(name)
                        .ok_or_else(|| Error::InvalidVariable(name.clone()))?;
                    let zero_arg = matches!(tokens.get(i + 2), Some(Token::RightParen));
                    ops.push(StackEntry::LeftParen {
                        func: Some(finfo),
                        args: if zero_arg { 0 } else { 1 },
                    });
                    i += 2;
                    state = ParserState::WantVal;
                } else {
                    let is_assign_target = matches!(
                        tokens.get(i + 1),
                        Some(Token::Op(op)) if registry::find_infix(op).is_some_and(|info| info.assigns)
                    );
                    if is_assign_target {
                        output.push(RpnItem::AssignTarget(name.clone()));
                    } else {
                        output.push(RpnItem::Var(name.clone()));
                    }
                    state = ParserState::HaveVal;
                    i += 1;
                }
            }
            Token::LeftParen => {
                if state == ParserState::HaveVal {
                    let times = registry::find_infix("*").expect("registry has *");
                    pop_higher_prec(&mut output, &mut ops, times.prec, times.assoc);
                    ops.push(StackEntry::Op(times, OpKind::Infix));
                }
                ops.push(StackEntry::LeftParen { func: None, args: 0 });
                state = ParserState::WantVal;
                i += 1;
            }
            Token::RightParen => {
                let empty_call = state == ParserState::WantVal
                    && matches!(ops.last(), Some(StackEntry::LeftParen { func: Some(_), .. }));
                if state != ParserState::HaveVal && !empty_call {
                    return Err(Error::InvalidToken(")".to_string()));
                }
                if empty_call {
                    state = ParserState::HaveVal;
                }
                loop {
                    match ops.pop() {
                        Some(StackEntry::LeftParen { func, args }) => {
                            if let Some(finfo) = func {
                                check_arity(finfo, args)?;
                                output.push(RpnItem::Func(finfo, args));
                            }
                            break;
                        }
                        Some(StackEntry::Op(info, kind)) => output.push(RpnItem::Op(info, kind)),
                        None => return Err(Error::InvalidToken(")".to_string())),
                    }
                }
                state = ParserState::HaveVal;
                i += 1;
            }
            Token::Comma => {
                if state != ParserState::HaveVal {
                    return Err(Error::InvalidToken(",".to_string()));
                }
                loop {
                    match ops.last() {
                        Some(StackEntry::LeftParen { .. }) => break,
                        Some(StackEntry::Op(..)) => {
                            if let Some(StackEntry::Op(info, kind)) = ops.pop() {
                                output.push(RpnItem::Op(info, kind));
                            }
                        }
                        None => return Err(Error::InvalidToken(",".to_string())),
                    }
                }
                match ops.last_mut() {
                    Some(StackEntry::LeftParen { func: Some(_), args }) => *args += 1,
                    _ => return Err(Error::InvalidToken(",".to_string())),
                }
                state = ParserState::WantVal;
                i += 1;
            }
            Token::Op(id) => match state {
                ParserState::WantVal => {
                    let info = registry::find_prefix(id).ok_or_else(|| Error::InvalidOp(id.clone()))?;
                    ops.push(StackEntry::Op(info, OpKind::Prefix));
                    i += 1;
                }
                ParserState::HaveVal => {
                    if let Some(info) = registry::find_postfix(id) {
                        pop_higher_prec(&mut output, &mut ops, info.prec, info.assoc);
                        output.push(RpnItem::Postfix(info));
                        i += 1;
                    } else if let Some(info) = registry::find_infix(id) {
                        pop_higher_prec(&mut output, &mut ops, info.prec, info.assoc);
                        ops.push(StackEntry::Op(info, OpKind::Infix));
                        state = ParserState::WantVal;
                        i += 1;
                    } else {
                        return Err(Error::InvalidOp(id.clone()));
                    }
                }
            },
            Token::Semicolon | Token::Newline | Token::Eof => break,
        }
    }

    if state != ParserState::HaveVal {
        return Err(Error::InvalidToken("incomplete expression".to_string()));
    }
    while let Some(entry) = ops.pop() {
        match entry {
            StackEntry::Op(info, kind) => output.push(RpnItem::Op(info, kind)),
            StackEntry::LeftParen { .. } => return Err(Error::InvalidToken("(".to_string())),
        }
    }
    Ok(output)
}

fn check_arity(info: &FnInfo, got: usize) -> Result<(), Error> {
    if info.arity >= 0 {
        if got != info.arity as usize {
            return Err(Error::BadArgCount {
                name: info.id.to_string(),
                expected: info.arity.to_string(),
                got,
            });
        }
    } else if got == 0 {
        return Err(Error::BadArgCount {
            name: info.id.to_string(),
            expected: "1 or more".to_string(),
            got,
        });
    }
    Ok(())
}

fn bool_val(b: bool) -> BigDec {
    if b {
        BigDec::from_i64(1)
    } else {
        BigDec::zero()
    }
}

fn apply_prefix(op: &OpInfo, v: BigDec) -> Result<BigDec, Error> {
    match op.id {
        "+" => Ok(v),
        "-" => Ok(-v),
        "!" => Ok(bool_val(v.is_zero())),
        other => Err(Error::InvalidOp(other.to_string())),
    }
}

fn apply_postfix(op: &OpInfo, v: BigDec) -> Result<BigDec, Error> {
    match op.id {
        "!" => factorial(v),
        other => Err(Error::InvalidOp(other.to_string())),
    }
}

fn apply_infix_value(op: &OpInfo, l: &BigDec, r: &BigDec) -> Result<BigDec, Error> {
    match op.id {
        "+" | "+=" => Ok(l + r),
        "-" | "-=" => Ok(l - r),
        "*" | "*=" => Ok(l * r),
        "/" | "/=" => {
            // `BigN::operator/=` is a documented no-op in the original;
            // kept as one here (spec.md §9).
            let mut out = l.clone();
            out /= r;
            Ok(out)
        }
        "^" => power(l, r),
        "<" => Ok(bool_val(l.compare(r) == Ordering::Less)),
        "<=" => Ok(bool_val(l.compare(r) != Ordering::Greater)),
        ">" => Ok(bool_val(l.compare(r) == Ordering::Greater)),
        ">=" => Ok(bool_val(l.compare(r) != Ordering::Less)),
        "==" => Ok(bool_val(l.compare(r) == Ordering::Equal)),
        "!=" => Ok(bool_val(l.compare(r) != Ordering::Equal)),
        "&&" => Ok(bool_val(!l.is_zero() && !r.is_zero())),
        "||" => Ok(bool_val(!l.is_zero() || !r.is_zero())),
        "=" => Ok(r.clone()),
        other => Err(Error::InvalidOp(other.to_string())),
    }
}

fn power(base: &BigDec, exp: &BigDec) -> Result<BigDec, Error> {
    let e = exp
        .to_u32()
        .ok_or_else(|| Error::EvalError("^ requires a non-negative integer exponent".to_string()))?;
    let mut result = BigDec::from_i64(1);
    for _ in 0..e {
        result = &result * base;
    }
    Ok(result)
}

fn factorial(n: BigDec) -> Result<BigDec, Error> {
    if n.is_negative() {
        return Err(Error::EvalError("factorial of a negative number".to_string()));
    }
    let k = n
        .to_u32()
        .ok_or_else(|| Error::EvalError("factorial requires a non-negative integer".to_string()))?;
    let mut result = BigDec::from_i64(1);
    for i in 2..=k {
        result = &result * &BigDec::from_i64(i as i64);
    }
    Ok(result)
}

fn apply_function(info: &FnInfo, args: &[BigDec], out: &mut dyn Write) -> Result<BigDec, Error> {
    match info.id {
        "sum2" => Ok(&args[0] + &args[1]),
        "neg" => Ok(-args[0].clone()),
        "fact" => factorial(args[0].clone()),
        "help" => {
            let _ = writeln!(out, "builtins: sum2(a,b) neg(a) fact(n) max(...) min(...) sum(...) avg(...)");
            Ok(BigDec::zero())
        }
        "max" => Ok(args.iter().cloned().fold(args[0].clone(), |a, b| if b > a { b } else { a })),
        "min" => Ok(args.iter().cloned().fold(args[0].clone(), |a, b| if b < a { b } else { a })),
        "sum" => Ok(args.iter().fold(BigDec::zero(), |acc, x| &acc + x)),
        "avg" => {
            let sum = args.iter().fold(BigDec::zero(), |acc, x| &acc + x);
            Ok(sum.div_by_u32(args.len() as u32, BigDec::AVG_EXTRA_SCALE))
        }
        other => Err(Error::InvalidOp(other.to_string())),
    }
}

/// One postfix-stack slot. Holds a [`SharedNum`] rather than an owned
/// `BigDec` so that pushing a variable's value shares it with the
/// environment (`ShrdNum<T>`'s role as `Calculator<T>`'s operand storage)
/// instead of deep-copying its chunk vector; `var` is set only when the
/// slot came directly from a variable reference, so an assigning
/// operator knows where to write its result back.
#[derive(Clone)]
struct EvalVal {
    handle: SharedNum<BigDec>,
    var: Option<String>,
}

impl EvalVal {
    fn plain(value: BigDec) -> Self {
        EvalVal { handle: SharedNum::new(value), var: None }
    }

    fn value(&self) -> BigDec {
        self.handle.get().clone()
    }
}

/// Evaluates a postfix stream, returning the final value plus the name
/// of the variable it came from, if the top-of-stack slot is tagged with
/// one (spec.md: "if the token was a named variable ... print
/// `name==value`; else print `value`").
fn eval_postfix(rpn: &[RpnItem], env: &mut Environment, out: &mut dyn Write) -> Result<(BigDec, Option<String>), Error> {
    let mut stack: Vec<EvalVal> = Vec::new();
    for item in rpn {
        match item {
            RpnItem::Number(n) => stack.push(EvalVal::plain(n.clone())),
            RpnItem::Var(name) => {
                // A scratch read: errors on an unbound name rather than
                // silently defaulting to zero. `var` stays `None` here —
                // a bare variable read prints its value, not `name==value`
                // (only an assignment's result carries the printable
                // name tag — spec.md's "ans\n" prints "5", not "ans==5").
                let handle = env.get(name).ok_or_else(|| Error::InvalidVariable(name.clone()))?;
                stack.push(EvalVal { handle, var: None });
            }
            RpnItem::AssignTarget(name) => {
                let handle = env.slot_mut(name);
                stack.push(EvalVal { handle, var: Some(name.clone()) });
            }
            RpnItem::Op(info, OpKind::Prefix) => {
                let v = stack.pop().ok_or_else(|| Error::EvalError("stack underflow".to_string()))?;
                stack.push(EvalVal::plain(apply_prefix(info, v.value())?));
            }
            RpnItem::Postfix(info) => {
                let v = stack.pop().ok_or_else(|| Error::EvalError("stack underflow".to_string()))?;
                stack.push(EvalVal::plain(apply_postfix(info, v.value())?));
            }
            RpnItem::Op(info, OpKind::Infix) => {
                let r = stack.pop().ok_or_else(|| Error::EvalError("stack underflow".to_string()))?;
                let l = stack.pop().ok_or_else(|| Error::EvalError("stack underflow".to_string()))?;
                if info.assigns {
                    let target = l.var.clone().ok_or_else(|| Error::InvalidVariable("<expression>".to_string()))?;
                    let result = apply_infix_value(info, &l.value(), &r.value())?;
                    env.set(&target, result);
                    let handle = env.get(&target).expect("just set above");
                    stack.push(EvalVal { handle, var: Some(target) });
                } else {
                    stack.push(EvalVal::plain(apply_infix_value(info, &l.value(), &r.value())?));
                }
            }
            RpnItem::Func(info, argc) => {
                let argc = *argc;
                if stack.len() < argc {
                    return Err(Error::EvalError("stack underflow".to_string()));
                }
                let args: Vec<BigDec> = stack.split_off(stack.len() - argc).iter().map(EvalVal::value).collect();
                stack.push(EvalVal::plain(apply_function(info, &args, out)?));
            }
        }
    }
    if stack.len() != 1 {
        return Err(Error::EvalError("malformed expression".to_string()));
    }
    let top = stack.pop().unwrap();
    Ok((top.value(), top.var))
}

/// Drives tokenization, parsing and evaluation over a whole source
/// string, one statement at a time, with per-statement error recovery
/// matching `ReadAndComp`'s `catch(exInvalidTk&)` block.
pub struct Evaluator {
    pub env: Environment,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator { env: Environment::new() }
    }

    /// Evaluates one already-tokenized statement (no terminator token),
    /// printing its result the way the original prints `id==value` or a
    /// bare `value`, and updates `ans` on success.
    fn run_statement(&mut self, tokens: &[Token], out: &mut dyn Write) -> Result<(), Error> {
        if tokens.is_empty() {
            return Ok(());
        }
        let rpn = to_postfix(tokens)?;
        let (value, named) = eval_postfix(&rpn, &mut self.env, out)?;
        self.env.set_ans(value.clone());
        match named {
            Some(name) => {
                let _ = writeln!(out, "{name}=={value}");
            }
            None => {
                let _ = writeln!(out, "{value}");
            }
        }
        Ok(())
    }

    /// Runs a full source string, returning the number of statements
    /// that failed (the original's `FAILURE`/`SUCCESS` per statement,
    /// tallied into a process exit status by the caller). A lexer error
    /// mid-statement discards every remaining token up to (and
    /// including) the next terminator, rather than letting the tail of
    /// the broken statement restart as a fresh one (spec.md §7/§8:
    /// `1++2\n3+4\n` reports exactly one error, then `7`).
    pub fn run(&mut self, source: &str, out: &mut dyn Write) -> usize {
        let mut lexer = Lexer::new(source);
        let mut failures = 0usize;
        let mut statement: Vec<Token> = Vec::new();
        let mut recovering = false;
        loop {
            let info = match lexer.next_token() {
                Ok(info) => info,
                Err(e) => {
                    if !recovering {
                        let _ = writeln!(out, "Error: {e}");
                        failures += 1;
                        recovering = true;
                    }
                    statement.clear();
                    continue;
                }
            };
            let is_eof = info.token == Token::Eof;
            if info.token.is_terminator() {
                if recovering {
                    recovering = false;
                } else if !statement.is_empty() {
                    if let Err(e) = self.run_statement(&statement, out) {
                        let _ = writeln!(out, "Error: {e}");
                        failures += 1;
                    }
                }
                statement.clear();
            } else if !recovering {
                statement.push(info.token);
            }
            if is_eof {
                break;
            }
        }
        failures
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> (String, usize) {
        let mut ev = Evaluator::new();
        let mut out = Vec::new();
        let failures = ev.run(src, &mut out);
        (String::from_utf8(out).unwrap(), failures)
    }

    #[test]
    fn simple_arithmetic() {
        let (out, failures) = run("1 + 2 * 3;\n");
        assert_eq!(failures, 0);
        assert_eq!(out.trim(), "7");
    }

    #[test]
    fn operator_precedence_and_parens() {
        let (out, _) = run("(1 + 2) * 3;\n");
        assert_eq!(out.trim(), "9");
    }

    #[test]
    fn assignment_prints_name_eq_value() {
        let (out, failures) = run("x = 5;\n");
        assert_eq!(failures, 0);
        assert_eq!(out.trim(), "x==5");
    }

    #[test]
    fn ans_is_updated_on_success_only() {
        let mut ev = Evaluator::new();
        let mut out = Vec::new();
        ev.run("3 + 4;\n", &mut out);
        assert_eq!(ev.env.get("ans").unwrap().to_string(), "7");
        let before = ev.env.get("ans").unwrap();
        ev.run("1 +;\n", &mut out);
        assert_eq!(ev.env.get("ans").unwrap(), before);
    }

    #[test]
    fn unregistered_adjacent_operator_run_reports_one_error_then_recovers() {
        let (out, failures) = run("1++2\n3+4\n");
        assert_eq!(failures, 1);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2, "expected one error line and one result line, got {lines:?}");
        assert!(lines[0].starts_with("Error:"));
        assert_eq!(lines[1], "7");
    }

    #[test]
    fn bad_statement_does_not_abort_the_rest() {
        let (out, failures) = run("1 +;\n2 + 2;\n");
        assert_eq!(failures, 1);
        assert!(out.contains("Error:"));
        assert!(out.contains('4'));
    }

    #[test]
    fn function_calls() {
        let (out, failures) = run("max(1, 5, 3);\n");
        assert_eq!(failures, 0);
        assert_eq!(out.trim(), "5");
    }

    #[test]
    fn wrong_arg_count_is_reported() {
        let (_out, failures) = run("sum2(1);\n");
        assert_eq!(failures, 1);
    }

    #[test]
    fn zero_arg_call_parses_and_evaluates() {
        let (out, failures) = run("help();\n");
        assert_eq!(failures, 0);
        assert!(out.contains("builtins:"));
    }

    #[test]
    fn variadic_function_rejects_zero_args() {
        let (_out, failures) = run("max();\n");
        assert_eq!(failures, 1);
    }

    #[test]
    fn implicit_multiplication_before_paren() {
        let (out, _) = run("x = 3; 2(x + 1);\n");
        assert_eq!(out.trim().lines().last().unwrap(), "8");
    }

    #[test]
    fn preloaded_variables() {
        let (out, _) = run("Pi;\n");
        assert_eq!(out.trim(), "3.14");
    }

    #[test]
    fn unbound_variable_read_is_an_error() {
        let (out, failures) = run("y + 1;\n");
        assert_eq!(failures, 1);
        assert!(out.contains("Error:"));
    }

    #[test]
    fn assignment_creates_a_previously_unseen_variable() {
        let (out, failures) = run("z = 9; z + 1;\n");
        assert_eq!(failures, 0);
        assert_eq!(out.trim().lines().last().unwrap(), "10");
    }

    #[test]
    fn compound_assignment_to_a_fresh_variable_starts_from_zero() {
        let (out, failures) = run("w += 5;\n");
        assert_eq!(failures, 0);
        assert_eq!(out.trim(), "w==5");
    }
}
