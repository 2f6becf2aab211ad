//! Section-driven construction for field-table reports (AIF, AIFM).

use regxml_model::{
    BuildError, Check, DocumentNode, FieldRow, FieldRule, GroupRule, Item, MemberSelector,
    Presence, Result, SectionRule, Sweep,
};

use crate::eval::{Context, Member, Scope, apply_transform, check_constraint};

/// Walks every section in declared order, attaching output under `root`.
pub(crate) fn build_sections(
    root: &mut DocumentNode,
    sections: &[SectionRule],
    scope: Scope<'_>,
    report: regxml_model::ReportType,
) -> Result<()> {
    for section in sections {
        let ctx = Context {
            report,
            section: section.name,
        };
        apply_items(&section.items, scope, &ctx, root, &section.parent)?;
    }
    Ok(())
}

fn apply_items(
    items: &[Item],
    scope: Scope<'_>,
    ctx: &Context<'_>,
    target: &mut DocumentNode,
    base: &[&str],
) -> Result<()> {
    for item in items {
        match item {
            Item::Field(rule) => apply_field(rule, scope, ctx, target, base)?,
            Item::Sweep(sweep) => apply_sweep(sweep, scope, ctx, target, base)?,
            Item::Group(group) => apply_group(group, scope, ctx, target, base)?,
            Item::Check(check) => apply_check(check, scope, ctx)?,
        }
    }
    Ok(())
}

/// Appends `node` below `base` + `path`, creating containers on first use and
/// reusing the last container of the same name afterwards.
pub(crate) fn attach(target: &mut DocumentNode, base: &[&str], path: &[&str], node: DocumentNode) {
    let parent = base
        .iter()
        .chain(path)
        .fold(target, |parent, name| parent.last_child_or_insert(name));
    parent.children.push(node);
}

fn apply_field(
    rule: &FieldRule,
    scope: Scope<'_>,
    ctx: &Context<'_>,
    target: &mut DocumentNode,
    base: &[&str],
) -> Result<()> {
    if !scope.holds(&rule.when) {
        return Ok(());
    }
    let value = scope.resolve(rule.source);
    if value.is_empty() {
        match rule.presence {
            Presence::Required => return Err(ctx.missing(rule.element)),
            Presence::Optional => return Ok(()),
            Presence::Always => {}
        }
    } else {
        for constraint in &rule.constraints {
            check_constraint(*constraint, &value, ctx, rule.element)?;
        }
    }
    let text = apply_transform(rule.transform, &value, ctx, rule.element)?;
    attach(
        target,
        base,
        &rule.path,
        DocumentNode::with_text(rule.element, text),
    );
    Ok(())
}

fn apply_sweep(
    sweep: &Sweep,
    scope: Scope<'_>,
    ctx: &Context<'_>,
    target: &mut DocumentNode,
    base: &[&str],
) -> Result<()> {
    if !scope.holds(&sweep.when) {
        return Ok(());
    }

    // One entry per tag, positioned at its first row, valued by its last.
    let mut entries: Vec<(&str, &str)> = Vec::new();
    for row in scope.table.labelled(sweep.first, sweep.last) {
        let value = row.value(regxml_model::Slot::Input(1)).trim();
        match entries.iter_mut().find(|(tag, _)| *tag == row.tag) {
            Some(entry) => entry.1 = value,
            None => entries.push((row.tag.as_str(), value)),
        }
    }

    for (tag, value) in entries {
        if tag.is_empty() || sweep.skip_tags.contains(&tag) {
            continue;
        }
        let element = if value.is_empty() {
            match sweep.presence {
                Presence::Required => return Err(ctx.missing(tag)),
                Presence::Optional => None,
                Presence::Always => Some(DocumentNode::with_text(tag, "")),
            }
        } else {
            let text = apply_transform(sweep.transform_for(tag), value, ctx, tag)?;
            Some(DocumentNode::with_text(tag, text))
        };
        match (sweep.wrap, element) {
            (Some(wrapper), element) => {
                let mut node = DocumentNode::new(wrapper);
                node.children.extend(element);
                attach(target, base, &sweep.path, node);
            }
            (None, Some(element)) => attach(target, base, &sweep.path, element),
            (None, None) => {}
        }
    }
    Ok(())
}

fn apply_group(
    group: &GroupRule,
    scope: Scope<'_>,
    ctx: &Context<'_>,
    target: &mut DocumentNode,
    base: &[&str],
) -> Result<()> {
    let mut members = select_members(&group.members, scope, ctx)?;
    members.sort_by_key(|member| member.rank);

    for member in members {
        let mut node = DocumentNode::new(group.element);
        apply_items(&group.items, scope.with_member(member), ctx, &mut node, &[])?;
        attach(target, base, &group.path, node);
    }
    Ok(())
}

fn select_members<'a>(
    selector: &MemberSelector,
    scope: Scope<'a>,
    ctx: &Context<'_>,
) -> Result<Vec<Member<'a>>> {
    let table = scope.table;
    match selector {
        MemberSelector::Tags {
            prefix,
            first,
            last,
        } => table
            .rows()
            .iter()
            .filter(|row| is_member_tag(&row.tag, prefix, *first, *last))
            .map(|row| ranked_by_id(row, ctx))
            .collect(),
        MemberSelector::Ids(ids) => Ok(ids
            .iter()
            .filter_map(|(id, rank)| table.by_id(id).map(|row| Member { row, rank: *rank }))
            .collect()),
        MemberSelector::NumericIds { first, last } => table
            .numbered(*first, *last)
            .map(|row| ranked_by_id(row, ctx))
            .collect(),
    }
}

fn is_member_tag(tag: &str, prefix: &str, first: u32, last: u32) -> bool {
    tag.strip_prefix(prefix)
        .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse::<u32>().ok())
        .is_some_and(|n| (first..=last).contains(&n))
}

fn ranked_by_id<'a>(row: &'a FieldRow, ctx: &Context<'_>) -> Result<Member<'a>> {
    let id = row.id.trim();
    id.parse::<u32>()
        .map(|rank| Member { row, rank })
        .map_err(|_| BuildError::NotAnUnsignedInteger {
            at: ctx.at("Ranking"),
            value: id.to_string(),
        })
}

fn apply_check(check: &Check, scope: Scope<'_>, ctx: &Context<'_>) -> Result<()> {
    match check {
        Check::RequireAll { when, fields } => {
            if scope.holds(when)
                && let Some((name, _)) = fields
                    .iter()
                    .find(|(_, source)| scope.resolve(*source).is_empty())
            {
                return Err(ctx.missing(name));
            }
        }
        Check::PairedPresence { first, second } => {
            let a = scope.resolve(first.1);
            let b = scope.resolve(second.1);
            let missing = match (a.is_empty(), b.is_empty()) {
                (false, true) => Some((second.0, first.0)),
                (true, false) => Some((first.0, second.0)),
                _ => None,
            };
            if let Some((tag, counterpart)) = missing {
                return Err(BuildError::ConditionalFieldViolation {
                    at: ctx.at(tag),
                    counterpart: counterpart.to_string(),
                });
            }
        }
        Check::Constrain {
            element,
            source,
            constraint,
        } => {
            let value = scope.resolve(*source);
            if !value.is_empty() {
                check_constraint(*constraint, &value, ctx, element)?;
            }
        }
        Check::Unsupported {
            when,
            element,
            source,
        } => {
            if scope.holds(when) {
                return Err(BuildError::UnsupportedReportSubtype {
                    at: ctx.at(element),
                    value: scope.resolve(*source),
                });
            }
        }
    }
    Ok(())
}
