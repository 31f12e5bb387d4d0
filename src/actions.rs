// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use crate::convert::Convert;
use crate::error::{ConversionError, Error, Result};
use crate::translator::{Lng, Translator};

/// Details of the parser made available to custom action handlers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    pub(crate) program: String,
    pub(crate) description: String,
    pub(crate) width: Option<usize>,
}

impl Context {
    /// Name of the program being parsed for.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Description shown in the help statement.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Display width override, if one was given.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Error that makes the parser display the full help statement and
    /// exit successfully. Return it from the handler.
    pub fn help(&self) -> Error {
        Error::HelpRequested
    }

    /// Error that aborts parsing with the specified message.
    pub fn error<S: Into<String>>(&self, msg: S) -> Error {
        Error::Custom(msg.into())
    }
}

/// Handler called by a custom action, normalised to take the parser
/// [Context].
pub enum Callback<'a> {
    /// Handler for an option that takes no value.
    Flag(Box<dyn FnMut(&Context) -> Result<()> + 'a>),
    /// Handler for an option that takes a value.
    Value(Box<dyn FnMut(&Context, &str) -> Result<()> + 'a>),
}

impl<'a> fmt::Debug for Callback<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Callback::Flag(cb) => write!(f, "Callback::Flag: {:p}", cb),
            Callback::Value(cb) => write!(f, "Callback::Value: {:p}", cb),
        }
    }
}

/// Call shapes a custom handler can have. Used as the `Shape` parameter of
/// [Handler] to select the adapter; callers never name them.
pub mod shape {
    /// `FnMut() -> Result<()>`
    #[derive(Debug)]
    pub struct Flag;
    /// `FnMut(&Context) -> Result<()>`
    #[derive(Debug)]
    pub struct FlagWithContext;
    /// `FnMut(&str) -> Result<()>`
    #[derive(Debug)]
    pub struct Value;
    /// `FnMut(&Context, &str) -> Result<()>`
    #[derive(Debug)]
    pub struct ValueWithContext;
}

/// Trait that a custom action handler must implement.
///
/// It is implemented for closures and functions of the four shapes in
/// [shape]. Closure arguments must be annotated (`|value: &str| ...`) so
/// that exactly one shape matches.
pub trait Handler<'a, Shape> {
    /// Wrap the handler in the adapter for its shape.
    fn into_callback(self) -> Callback<'a>;
}

impl<'a, F> Handler<'a, shape::Flag> for F
where
    F: FnMut() -> Result<()> + 'a,
{
    fn into_callback(self) -> Callback<'a> {
        let mut handler = self;
        Callback::Flag(Box::new(move |_: &Context| handler()))
    }
}

impl<'a, F> Handler<'a, shape::FlagWithContext> for F
where
    F: FnMut(&Context) -> Result<()> + 'a,
{
    fn into_callback(self) -> Callback<'a> {
        Callback::Flag(Box::new(self))
    }
}

impl<'a, F> Handler<'a, shape::Value> for F
where
    F: FnMut(&str) -> Result<()> + 'a,
{
    fn into_callback(self) -> Callback<'a> {
        let mut handler = self;
        Callback::Value(Box::new(move |_: &Context, value: &str| handler(value)))
    }
}

impl<'a, F> Handler<'a, shape::ValueWithContext> for F
where
    F: FnMut(&Context, &str) -> Result<()> + 'a,
{
    fn into_callback(self) -> Callback<'a> {
        Callback::Value(Box::new(self))
    }
}

/// A collection that values can be added to, one per visit.
pub trait Collection {
    /// Type of a single element.
    type Item: Convert;

    /// Add an element. Sequences append, sets insert.
    fn add(&mut self, item: Self::Item);
}

impl<T: Convert> Collection for Vec<T> {
    type Item = T;

    fn add(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: Convert> Collection for VecDeque<T> {
    type Item = T;

    fn add(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T: Convert + Eq + Hash> Collection for HashSet<T> {
    type Item = T;

    fn add(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T: Convert + Ord> Collection for BTreeSet<T> {
    type Item = T;

    fn add(&mut self, item: T) {
        self.insert(item);
    }
}

type StoreFn<'a> = Box<dyn FnMut(&str, &str) -> Result<(), ConversionError> + 'a>;

/// Converts a value without storing it.
type CheckFn = fn(&str, &str) -> Result<(), ConversionError>;

fn check<T: Convert>(raw: &str, name: &str) -> Result<(), ConversionError> {
    T::convert(raw, name).map(|_| ())
}

/// What an action does when visited.
pub(crate) enum Kind<'a> {
    /// Overwrite a single destination.
    Store(StoreFn<'a>, CheckFn),
    /// Add to a collection.
    Collect(StoreFn<'a>, CheckFn),
    /// Write a fixed value; takes no argument.
    SetConstant(Box<dyn FnMut() + 'a>),
    /// Call a user handler.
    Custom(Callback<'a>),
}

impl<'a> fmt::Debug for Kind<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Store(..) => write!(f, "Store"),
            Kind::Collect(..) => write!(f, "Collect"),
            Kind::SetConstant(_) => write!(f, "SetConstant"),
            Kind::Custom(cb) => write!(f, "Custom({:?})", cb),
        }
    }
}

/// A declared argument: its names, help details, state and effect.
#[derive(Debug)]
pub(crate) struct Action<'a> {
    names: Vec<String>,
    meta: String,
    help: String,
    required: bool,
    multiple: bool,
    visited: bool,
    kind: Kind<'a>,
}

fn to_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl<'a> Action<'a> {
    fn new(names: &[&str], required: bool, multiple: bool, kind: Kind<'a>) -> Self {
        Action {
            names: to_names(names),
            meta: String::new(),
            help: String::new(),
            required,
            multiple,
            visited: false,
            kind,
        }
    }

    /// Store a converted value in `dst` on every visit.
    pub(crate) fn store<T: Convert + 'a>(dst: &'a mut T, names: &[&str], required: bool) -> Self {
        let store = move |raw: &str, name: &str| -> Result<(), ConversionError> {
            *dst = T::convert(raw, name)?;
            Ok(())
        };

        Action::new(names, required, false, Kind::Store(Box::new(store), check::<T>))
    }

    /// Add a converted value to `dst` on every visit.
    pub(crate) fn collect<C: Collection + 'a>(dst: &'a mut C, names: &[&str]) -> Self {
        let collect = move |raw: &str, name: &str| -> Result<(), ConversionError> {
            dst.add(C::Item::convert(raw, name)?);
            Ok(())
        };

        Action::new(names, true, true, Kind::Collect(Box::new(collect), check::<C::Item>))
    }

    /// Write `value` to `dst` when visited.
    pub(crate) fn set_constant<T: Clone + 'a>(dst: &'a mut T, value: T, names: &[&str]) -> Self {
        let set = move || *dst = value.clone();

        Action::new(names, false, false, Kind::SetConstant(Box::new(set)))
    }

    /// Flag-like handlers default to optional, value handlers to required.
    pub(crate) fn custom(callback: Callback<'a>, names: &[&str]) -> Self {
        let required = matches!(callback, Callback::Value(_));

        Action::new(names, required, false, Kind::Custom(callback))
    }

    pub(crate) fn required(&self) -> bool {
        self.required
    }

    pub(crate) fn set_required(&mut self, value: bool) {
        self.required = value;
    }

    pub(crate) fn multiple(&self) -> bool {
        self.multiple
    }

    /// Collections always take multiple values.
    pub(crate) fn set_multiple(&mut self, value: bool) {
        self.multiple = value || matches!(self.kind, Kind::Collect(..));
    }

    pub(crate) fn visited(&self) -> bool {
        self.visited
    }

    /// Whether the action consumes a value.
    pub(crate) fn needs_arg(&self) -> bool {
        match &self.kind {
            Kind::Store(..) | Kind::Collect(..) => true,
            Kind::SetConstant(_) => false,
            Kind::Custom(Callback::Flag(_)) => false,
            Kind::Custom(Callback::Value(_)) => true,
        }
    }

    /// Visit an action that takes no value.
    pub(crate) fn visit(&mut self, ctx: &Context, tr: &dyn Translator) -> Result<()> {
        let name = self.display_name(tr);

        match &mut self.kind {
            Kind::SetConstant(set) => set(),
            Kind::Custom(Callback::Flag(cb)) => cb(ctx)?,
            _ => return Err(Error::MissingParameter(name)),
        }

        self.visited = true;

        Ok(())
    }

    /// Visit an action that takes a value.
    pub(crate) fn visit_value(
        &mut self,
        ctx: &Context,
        tr: &dyn Translator,
        value: &str,
    ) -> Result<()> {
        let name = self.display_name(tr);

        match &mut self.kind {
            Kind::Store(store, _) | Kind::Collect(store, _) => store(value, &name)?,
            Kind::Custom(Callback::Value(cb)) => cb(ctx, value)?,
            _ => return Err(Error::UnexpectedValue(name)),
        }

        self.visited = true;

        Ok(())
    }

    /// Whether visiting calls user code, whose outcome cannot be known in
    /// advance.
    pub(crate) fn has_effects(&self) -> bool {
        matches!(self.kind, Kind::Custom(_))
    }

    /// Convert `value` as a visit would, without storing it.
    pub(crate) fn check_value(&self, tr: &dyn Translator, value: &str) -> Result<()> {
        match &self.kind {
            Kind::Store(_, check) | Kind::Collect(_, check) => {
                check(value, &self.display_name(tr))?;
                Ok(())
            }
            Kind::SetConstant(_) => Err(Error::UnexpectedValue(self.display_name(tr))),
            Kind::Custom(_) => Ok(()),
        }
    }

    /// Whether `name` is one of the long names.
    pub(crate) fn is_long(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.chars().count() > 1 && n == name)
    }

    /// Whether `c` is one of the short names.
    pub(crate) fn is_short(&self, c: char) -> bool {
        self.names.iter().any(|n| {
            let mut chars = n.chars();
            chars.next() == Some(c) && chars.next().is_none()
        })
    }

    pub(crate) fn is_positional(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn set_meta(&mut self, meta: &str) {
        self.meta = meta.into();
    }

    /// Placeholder for the value (translated default if unset).
    pub(crate) fn meta(&self, tr: &dyn Translator) -> String {
        if self.meta.is_empty() {
            tr.translate(Lng::DefMeta, "", "")
        } else {
            self.meta.clone()
        }
    }

    pub(crate) fn set_help(&mut self, help: &str) {
        self.help = help.into();
    }

    pub(crate) fn help(&self) -> &str {
        &self.help
    }

    /// Name used in messages: the first alias with its dashes, or the meta
    /// name for a positional.
    pub(crate) fn display_name(&self, tr: &dyn Translator) -> String {
        match self.names.first() {
            Some(name) => dashed(name),
            None => self.meta(tr),
        }
    }
}

/// Prefix a name with `-` (short) or `--` (long).
pub(crate) fn dashed(name: &str) -> String {
    if name.chars().count() > 1 {
        format!("--{}", name)
    } else {
        format!("-{}", name)
    }
}

/// Refines the argument just declared.
#[derive(Debug)]
pub struct Builder<'p, 'a> {
    action: &'p mut Action<'a>,
}

impl<'p, 'a> Builder<'p, 'a> {
    pub(crate) fn new(action: &'p mut Action<'a>) -> Self {
        Builder { action }
    }

    /// Specify the placeholder shown for the value.
    pub fn meta(self, name: &str) -> Self {
        self.action.set_meta(name);
        self
    }

    /// Specify the help text for the argument.
    pub fn help(self, text: &str) -> Self {
        self.action.set_help(text);
        self
    }

    /// Specify that the argument may be given more than once.
    pub fn multi(self) -> Self {
        self.multiple(true)
    }

    /// Specify whether the argument may be given more than once.
    pub fn multiple(self, value: bool) -> Self {
        self.action.set_multiple(value);
        self
    }

    /// Specify that the argument must be given.
    pub fn req(self) -> Self {
        self.required(true)
    }

    /// Specify that the argument may be omitted.
    pub fn opt(self) -> Self {
        self.required(false)
    }

    /// Specify whether the argument must be given.
    pub fn required(self, value: bool) -> Self {
        self.action.set_required(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::DefaultTranslator;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Level {
        Low,
        High,
    }

    crate::labeled_enum!(Level {
        "low" => Level::Low,
        "high" => Level::High,
    });

    #[test]
    fn test_store() {
        let tr = DefaultTranslator;
        let ctx = Context::default();

        let mut value = 0u32;
        {
            let mut action = Action::store(&mut value, &["n", "num"], true);

            assert!(action.needs_arg());
            assert!(action.required());
            assert!(!action.multiple());
            assert!(!action.visited());

            action.visit_value(&ctx, &tr, "3").unwrap();
            action.visit_value(&ctx, &tr, "7").unwrap();
            assert!(action.visited());

            assert_eq!(
                action.visit_value(&ctx, &tr, "x"),
                Err(Error::Conversion(ConversionError::NotANumber {
                    argument: "-n".into()
                }))
            );

            assert_eq!(
                action.visit(&ctx, &tr),
                Err(Error::MissingParameter("-n".into()))
            );
        }

        assert_eq!(value, 7);
    }

    #[test]
    fn test_store_enum() {
        let tr = DefaultTranslator;
        let ctx = Context::default();

        let mut level = Level::Low;
        {
            let mut action = Action::store(&mut level, &["level"], true);

            action.visit_value(&ctx, &tr, "high").unwrap();

            assert_eq!(
                action.visit_value(&ctx, &tr, "medium"),
                Err(Error::Conversion(ConversionError::UnknownEnumValue {
                    argument: "--level".into(),
                    value: "medium".into(),
                    known: "low, high".into(),
                }))
            );
        }

        assert_eq!(level, Level::High);
    }

    #[test]
    fn test_collect() {
        let tr = DefaultTranslator;
        let ctx = Context::default();

        let mut list: Vec<String> = Vec::new();
        let mut set: BTreeSet<i64> = BTreeSet::new();
        {
            let mut list_action = Action::collect(&mut list, &["item"]);
            let mut set_action = Action::collect(&mut set, &["n"]);

            assert!(list_action.multiple());
            assert!(list_action.required());
            assert!(list_action.needs_arg());

            for v in &["b", "a", "b"] {
                list_action.visit_value(&ctx, &tr, v).unwrap();
            }

            for v in &["3", "1", "3"] {
                set_action.visit_value(&ctx, &tr, v).unwrap();
            }
        }

        assert_eq!(list, vec!["b", "a", "b"]);
        assert_eq!(set.into_iter().collect::<Vec<i64>>(), vec![1, 3]);
    }

    #[test]
    fn test_set_constant() {
        let tr = DefaultTranslator;
        let ctx = Context::default();

        let mut enabled = false;
        {
            let mut action = Action::set_constant(&mut enabled, true, &["on", "1"]);

            assert!(!action.needs_arg());
            assert!(!action.required());

            assert_eq!(
                action.visit_value(&ctx, &tr, "x"),
                Err(Error::UnexpectedValue("--on".into()))
            );
            assert!(!action.visited());

            action.visit(&ctx, &tr).unwrap();
            assert!(action.visited());
        }

        assert!(enabled);
    }

    #[test]
    fn test_custom_shapes() {
        let tr = DefaultTranslator;
        let ctx = Context {
            program: "tool".into(),
            ..Default::default()
        };

        let mut calls: Vec<String> = Vec::new();
        {
            let calls = std::cell::RefCell::new(&mut calls);

            let mut flag = Action::custom((|| {
                calls.borrow_mut().push("flag".into());
                Ok(())
            })
            .into_callback(), &["f"]);

            let mut flag_ctx = Action::custom((|ctx: &Context| {
                calls.borrow_mut().push(format!("flag {}", ctx.program()));
                Ok(())
            })
            .into_callback(), &["g"]);

            let mut value = Action::custom((|v: &str| {
                calls.borrow_mut().push(format!("value {}", v));
                Ok(())
            })
            .into_callback(), &["v"]);

            let mut value_ctx = Action::custom((|ctx: &Context, v: &str| {
                calls.borrow_mut().push(format!("value {} {}", ctx.program(), v));
                Ok(())
            })
            .into_callback(), &["w"]);

            assert!(!flag.needs_arg());
            assert!(!flag.required());
            assert!(!flag_ctx.needs_arg());
            assert!(value.required());
            assert!(value.needs_arg());
            assert!(value_ctx.needs_arg());

            flag.visit(&ctx, &tr).unwrap();
            flag_ctx.visit(&ctx, &tr).unwrap();
            value.visit_value(&ctx, &tr, "a").unwrap();
            value_ctx.visit_value(&ctx, &tr, "b").unwrap();

            assert!(flag.visited() && flag_ctx.visited());
            assert!(value.visited() && value_ctx.visited());
        }

        assert_eq!(calls, vec!["flag", "flag tool", "value a", "value tool b"]);
    }

    #[test]
    fn test_custom_failure() {
        let tr = DefaultTranslator;
        let ctx = Context::default();

        let mut action = Action::custom(
            (|ctx: &Context, v: &str| Err(ctx.error(format!("bad value {}", v)))).into_callback(),
            &["x"],
        );

        assert_eq!(
            action.visit_value(&ctx, &tr, "1"),
            Err(Error::Custom("bad value 1".into()))
        );
        assert!(!action.visited());

        let mut help = Action::custom((|ctx: &Context| Err(ctx.help())).into_callback(), &["H"]);

        assert_eq!(help.visit(&ctx, &tr), Err(Error::HelpRequested));
    }

    #[test]
    fn test_names() {
        let tr = DefaultTranslator;

        let mut s = String::new();
        let mut p = String::new();
        let mut u = String::new();

        let action = Action::store(&mut s, &["o", "opt"], true);
        assert!(action.is_short('o'));
        assert!(!action.is_short('p'));
        assert!(action.is_long("opt"));
        assert!(!action.is_long("o"));
        assert!(!action.is_long("op"));
        assert!(!action.is_positional());
        assert_eq!(action.display_name(&tr), "-o");
        assert_eq!(action.meta(&tr), "ARG");

        let mut positional = Action::store(&mut p, &[], false);
        assert!(positional.is_positional());
        positional.set_meta("INPUT");
        assert_eq!(positional.display_name(&tr), "INPUT");

        // Multi-byte short names are still a single character.
        let unicode = Action::store(&mut u, &["人", "person"], true);
        assert!(unicode.is_short('人'));
        assert_eq!(unicode.display_name(&tr), "-人");
    }

    #[test]
    fn test_builder() {
        let mut s = String::new();
        let mut action = Action::store(&mut s, &["s"], true);

        Builder::new(&mut action)
            .meta("VAR")
            .help("some help")
            .multi()
            .opt();

        assert_eq!(action.meta(&DefaultTranslator), "VAR");
        assert_eq!(action.help(), "some help");
        assert!(action.multiple());
        assert!(!action.required());

        Builder::new(&mut action).req().multiple(false);

        assert!(action.required());
        assert!(!action.multiple());

        // A collection can't be made single-valued.
        let mut list: Vec<String> = Vec::new();
        let mut list_action = Action::collect(&mut list, &["item"]);

        Builder::new(&mut list_action).multiple(false);

        assert!(list_action.multiple());
    }

    #[test]
    fn test_check_value() {
        let tr = DefaultTranslator;

        let mut n = 0i32;
        let mut list: Vec<u8> = Vec::new();
        let mut enabled = false;
        let mut calls = 0;
        {
            let number = Action::store(&mut n, &["n"], true);
            let collect = Action::collect(&mut list, &["list"]);
            let constant = Action::set_constant(&mut enabled, true, &["on"]);
            let custom = Action::custom(
                (|| -> Result<()> {
                    calls += 1;
                    Ok(())
                })
                .into_callback(),
                &["version"],
            );

            assert_eq!(number.check_value(&tr, "12"), Ok(()));
            assert_eq!(
                number.check_value(&tr, "x"),
                Err(Error::from(ConversionError::NotANumber {
                    argument: "-n".into()
                }))
            );
            assert_eq!(
                collect.check_value(&tr, "256"),
                Err(Error::from(ConversionError::OutOfRange {
                    argument: "--list".into()
                }))
            );
            assert_eq!(
                constant.check_value(&tr, "x"),
                Err(Error::UnexpectedValue("--on".into()))
            );
            assert_eq!(custom.check_value(&tr, "x"), Ok(()));

            assert!(!number.has_effects());
            assert!(!constant.has_effects());
            assert!(custom.has_effects());
            assert!(!number.visited());
        }

        assert_eq!(n, 0);
        assert!(list.is_empty());
        assert_eq!(calls, 0);
    }
}
