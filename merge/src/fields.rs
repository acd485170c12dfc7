//! Member-level merge helpers shared by every declaration kind.

use sdl_merge_core::{DirectiveUsage, InputValue, TypeRef};

/// Reconciles two output (or argument) types.
///
/// Types that differ only in non-null wrappers at matching positions are
/// compatible and resolve to the stricter form. Any other difference is a
/// conflict.
pub(crate) fn reconcile_output(a: &TypeRef, b: &TypeRef) -> Option<TypeRef> {
    match (a, b) {
        (TypeRef::Named(x), TypeRef::Named(y)) => (x == y).then(|| a.clone()),
        (TypeRef::NonNull(x), TypeRef::NonNull(y)) => reconcile_output(x, y).map(TypeRef::non_null),
        (TypeRef::NonNull(x), other) | (other, TypeRef::NonNull(x)) => {
            reconcile_output(x, other).map(TypeRef::non_null)
        }
        (TypeRef::List(x), TypeRef::List(y)) => reconcile_output(x, y).map(TypeRef::list),
        _ => None,
    }
}

/// Fills an empty text slot from `incoming`; a non-empty slot is kept.
pub(crate) fn merge_text(target: &mut Option<String>, incoming: Option<String>) {
    let empty = target.as_deref().is_none_or(|text| text.trim().is_empty());
    if empty && incoming.as_deref().is_some_and(|text| !text.trim().is_empty()) {
        *target = incoming;
    }
}

/// Concatenates directive usages, dropping usages already present.
pub(crate) fn merge_directives(
    target: &mut Vec<DirectiveUsage>,
    incoming: Vec<DirectiveUsage>,
    reverse: bool,
) {
    let mut fresh: Vec<DirectiveUsage> = Vec::with_capacity(incoming.len());
    for usage in incoming {
        if !target.contains(&usage) && !fresh.contains(&usage) {
            fresh.push(usage);
        }
    }
    if reverse {
        fresh.append(target);
        *target = fresh;
    } else {
        target.append(&mut fresh);
    }
}

/// Appends names not yet present, keeping first-seen order.
pub(crate) fn union_names(target: &mut Vec<String>, incoming: Vec<String>) {
    for name in incoming {
        if !target.contains(&name) {
            target.push(name);
        }
    }
}

/// An argument declared on both sides with irreconcilable definitions.
pub(crate) struct ArgumentClash<'a> {
    pub existing: &'a InputValue,
    pub incoming: &'a InputValue,
    pub reason: String,
}

/// Finds the first argument that cannot be merged, if any.
pub(crate) fn argument_conflict<'a>(
    existing: &'a [InputValue],
    incoming: &'a [InputValue],
) -> Option<ArgumentClash<'a>> {
    incoming.iter().find_map(|arg| {
        let current = existing.iter().find(|e| e.name == arg.name)?;
        let reason = if reconcile_output(&current.ty, &arg.ty).is_none() {
            format!(
                "argument {} has type {} but was redeclared as {}",
                arg.name, current.ty, arg.ty
            )
        } else {
            format!("argument {}: {}", arg.name, default_conflict(current, arg)?)
        };
        Some(ArgumentClash {
            existing: current,
            incoming: arg,
            reason,
        })
    })
}

/// Unions two compatible argument lists by name.
pub(crate) fn merge_arguments(target: &mut Vec<InputValue>, incoming: Vec<InputValue>, reverse: bool) {
    for arg in incoming {
        match target.iter_mut().find(|e| e.name == arg.name) {
            Some(current) => {
                if let Some(ty) = reconcile_output(&current.ty, &arg.ty) {
                    current.ty = ty;
                }
                merge_input_value(current, arg, reverse);
            }
            None => target.push(arg),
        }
    }
}

/// Describes why two input-object fields cannot be merged, if they cannot.
pub(crate) fn input_field_conflict(existing: &InputValue, incoming: &InputValue) -> Option<String> {
    if existing.ty != incoming.ty {
        return Some(format!(
            "type {} conflicts with {}",
            existing.ty, incoming.ty
        ));
    }
    default_conflict(existing, incoming)
}

/// Folds the non-type parts of `incoming` into `target`.
pub(crate) fn merge_input_value(target: &mut InputValue, incoming: InputValue, reverse: bool) {
    if target.default_value.is_none() {
        target.default_value = incoming.default_value;
    }
    merge_text(&mut target.description, incoming.description);
    merge_text(&mut target.comment, incoming.comment);
    merge_directives(&mut target.directives, incoming.directives, reverse);
}

fn default_conflict(existing: &InputValue, incoming: &InputValue) -> Option<String> {
    match (&existing.default_value, &incoming.default_value) {
        (Some(a), Some(b)) if a != b => Some(format!("default value {a} conflicts with {b}")),
        _ => None,
    }
}
