//! Group hierarchy display formatting

use crate::storage::{BindIndex, GroupStore};

/// Format the group forest as a tree with per-group bind counts
pub fn format_group_tree(groups: &GroupStore, binds: &BindIndex) -> String {
    if groups.is_empty() {
        return "No groups defined.\n\nAdd groups to groups.yml or run 'moneymanager group create'."
            .to_string();
    }

    let mut output = String::new();
    for root in groups.roots() {
        output.push_str(&group_line(groups, binds, root));
        output.push('\n');
        append_children(groups, binds, root, "", &mut output);
    }
    output
}

fn group_line(groups: &GroupStore, binds: &BindIndex, name: &str) -> String {
    let count = binds.for_group(name).count();
    let rules = match groups.get(name).and_then(|g| g.rule.as_ref()) {
        Some(_) => " [rules]",
        None => "",
    };
    format!("{name} ({count}){rules}")
}

fn append_children(
    groups: &GroupStore,
    binds: &BindIndex,
    name: &str,
    prefix: &str,
    output: &mut String,
) {
    let Some(group) = groups.get(name) else {
        return;
    };

    let count = group.subgroups.len();
    for (i, sub) in group.subgroups.iter().enumerate() {
        let last = i + 1 == count;
        let glyph = if last { "└── " } else { "├── " };
        output.push_str(&format!(
            "{prefix}{glyph}{}\n",
            group_line(groups, binds, sub)
        ));

        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        append_children(groups, binds, sub, &child_prefix, output);
    }
}
