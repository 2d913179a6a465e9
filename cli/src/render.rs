//! Plain-text usage and help rendering for [`NodeHelp`].

use std::fmt::Write as _;

use elegant_cli_core::{HELP_FLAGS, Literal, NodeHelp, ParamHelp};

const HELP_COLUMN: usize = 24;

fn metavar(param: &ParamHelp) -> String {
    param.identifier.to_uppercase()
}

fn flag_body(param: &ParamHelp) -> String {
    match param.type_tag.as_str() {
        "bool" => param.name.clone(),
        "list" => format!("{} {m} [{m} ...]", param.name, m = metavar(param)),
        _ => format!("{} {}", param.name, metavar(param)),
    }
}

fn flag_usage(param: &ParamHelp) -> String {
    let body = flag_body(param);
    if param.required {
        body
    } else {
        format!("[{body}]")
    }
}

fn positional_usage(param: &ParamHelp) -> String {
    let body = if param.type_tag == "list" {
        format!("{n} [{n} ...]", n = param.name)
    } else {
        param.name.clone()
    };
    if param.required {
        body
    } else {
        format!("[{body}]")
    }
}

fn command_line(help: &NodeHelp) -> String {
    std::iter::once(help.program.as_str())
        .chain(help.path.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line usage, e.g. `usage: docs [-h] [-o O] [directory] {scan,by_config} ...`.
pub fn usage(help: &NodeHelp) -> String {
    let mut parts = vec![command_line(help), format!("[{}]", HELP_FLAGS[0])];
    parts.extend(help.params.iter().filter(|p| !p.positional).map(flag_usage));
    parts.extend(help.params.iter().filter(|p| p.positional).map(positional_usage));
    if !help.children.is_empty() {
        let names: Vec<&str> = help.children.iter().map(|c| c.name.as_str()).collect();
        parts.push(format!("{{{}}}", names.join(",")));
        parts.push("...".to_string());
    }
    format!("usage: {}", parts.join(" "))
}

fn describe_default(default: &Literal) -> String {
    match default {
        Literal::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn entry(out: &mut String, label: &str, text: &str) {
    if label.len() + 2 >= HELP_COLUMN {
        let _ = writeln!(out, "  {label}");
        if !text.is_empty() {
            let _ = writeln!(out, "{:width$}{text}", "", width = HELP_COLUMN);
        }
    } else if text.is_empty() {
        let _ = writeln!(out, "  {label}");
    } else {
        let _ = writeln!(out, "  {label:<width$}{text}", width = HELP_COLUMN - 2);
    }
}

fn param_text(param: &ParamHelp) -> String {
    let mut text = param.help.clone().unwrap_or_default();
    if let Some(default) = &param.default {
        if !text.is_empty() {
            text.push(' ');
        }
        let _ = write!(text, "(default: {})", describe_default(default));
    }
    text
}

fn param_label(param: &ParamHelp) -> String {
    if param.positional {
        param.name.clone()
    } else {
        flag_body(param)
    }
}

fn section(out: &mut String, title: &str, params: &[&ParamHelp]) {
    if params.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}:");
    for param in params {
        entry(out, &param_label(param), &param_text(param));
    }
}

/// Full help text for one command.
pub fn help(help: &NodeHelp) -> String {
    let mut out = usage(help);
    out.push('\n');

    if let Some(text) = &help.help {
        let _ = writeln!(out, "\n{text}");
    }

    let positionals: Vec<&ParamHelp> = help.params.iter().filter(|p| p.positional).collect();
    section(&mut out, "positional arguments", &positionals);

    if !help.children.is_empty() {
        let _ = writeln!(out, "\ncommands:");
        for child in &help.children {
            let mut text = child.help.clone().unwrap_or_default();
            if child.is_default {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str("(default)");
            }
            entry(&mut out, &child.name, &text);
        }
    }

    let _ = writeln!(out, "\noptions:");
    entry(&mut out, &HELP_FLAGS.join(", "), "show this help message and exit");
    for param in help.params.iter().filter(|p| !p.positional) {
        entry(&mut out, &param_label(param), &param_text(param));
    }

    let inherited: Vec<&ParamHelp> = help.inherited.iter().collect();
    section(&mut out, "inherited", &inherited);

    out
}
