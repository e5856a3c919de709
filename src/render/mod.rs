/*
    This module draws derivation trees returned by the grammar service
*/

use serde_json::Value;

use crate::service::DerivationTree;

// Trees come as nested `{ "name": .., "children": [..] }` nodes. Anything
// else is shown as plain JSON.
pub fn render_tree(tree: &DerivationTree) -> Vec<String> {
    if tree.0.get("name").is_none() {
        let json = serde_json::to_string_pretty(&tree.0).unwrap_or_else(|_| tree.0.to_string());
        return json.lines().map(str::to_string).collect();
    }

    let mut lines = vec![node_name(&tree.0)];
    render_children(&tree.0, "", &mut lines);
    lines
}

fn node_name(node: &Value) -> String {
    match node.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}

fn render_children(node: &Value, prefix: &str, lines: &mut Vec<String>) {
    let Some(children) = node.get("children").and_then(Value::as_array) else {
        return;
    };

    for (index, child) in children.iter().enumerate() {
        let last = index + 1 == children.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };

        lines.push(format!("{}{}{}", prefix, branch, node_name(child)));
        render_children(child, &format!("{}{}", prefix, indent), lines);
    }
}
