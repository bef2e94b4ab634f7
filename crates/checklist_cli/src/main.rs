//! Checklist command-line driver.
//!
//! # Responsibility
//! - Apply one checklist action to the configured state database.
//! - Print the resulting summary and tree in a stable text layout.

use checklist_core::db::open_db;
use checklist_core::{
    init_logging, CategoryId, CheckState, ChecklistConfig, ChecklistService, ChecklistTree,
    SqliteStateStore, SubcategoryId,
};
use std::process::ExitCode;

const USAGE: &str = "usage: checklist_cli [show | toggle-all | toggle-category <id> | \
toggle-subcategory <id> | open <id> | toggle-panel | close-panel | reset]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Show,
    ToggleAll,
    ToggleCategory(CategoryId),
    ToggleSubcategory(SubcategoryId),
    OpenCategory(CategoryId),
    TogglePanel,
    ClosePanel,
    Reset,
}

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("checklist_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    let config = ChecklistConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)
        .map_err(|err| format!("open {} failed: {err}", config.db_path.display()))?;
    let store = SqliteStateStore::try_new(&conn).map_err(|err| err.to_string())?;
    let mut service = ChecklistService::new(store);
    service.load_or_default();

    let result = match command {
        Command::Show => Ok(()),
        Command::ToggleAll => service.toggle_all(),
        Command::ToggleCategory(id) => service.toggle_category(id),
        Command::ToggleSubcategory(id) => service.toggle_subcategory(id),
        Command::OpenCategory(id) => service.toggle_category_open(id),
        Command::TogglePanel => service.toggle_checklist(),
        Command::ClosePanel => service.close_checklist(),
        Command::Reset => service.clear_saved_state(),
    };
    result.map_err(|err| err.to_string())?;

    println!("checklist_core version={}", checklist_core::core_version());
    println!("summary: {}", service.summary());
    print!("{}", render_tree(service.tree()));
    Ok(())
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let name = args.first().map(String::as_str).unwrap_or("show");
    let id = || -> Result<u32, String> {
        let raw = args
            .get(1)
            .ok_or_else(|| format!("`{name}` requires an id"))?;
        raw.parse::<u32>()
            .map_err(|_| format!("invalid id `{raw}`"))
    };

    let command = match name {
        "show" => Command::Show,
        "toggle-all" => Command::ToggleAll,
        "toggle-category" => Command::ToggleCategory(CategoryId::new(id()?)),
        "toggle-subcategory" => Command::ToggleSubcategory(SubcategoryId::new(id()?)),
        "open" => Command::OpenCategory(CategoryId::new(id()?)),
        "toggle-panel" => Command::TogglePanel,
        "close-panel" => Command::ClosePanel,
        "reset" => Command::Reset,
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(command)
}

fn render_tree(tree: &ChecklistTree) -> String {
    let mut output = format!("{} all\n", state_marker(tree.global_state()));
    for category in &tree.categories {
        let expander = if category.open { "v" } else { ">" };
        output.push_str(&format!(
            "  {} {} #{} {}\n",
            expander,
            state_marker(category.check_state()),
            category.id,
            category.name
        ));
        for sub in &category.subcategories {
            let marker = if sub.checked { "[x]" } else { "[ ]" };
            output.push_str(&format!(
                "      {} #{} {} {}\n",
                marker, sub.id, sub.name, sub.color
            ));
        }
    }
    output
}

fn state_marker(state: CheckState) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
        CheckState::Unchecked => "[ ]",
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, render_tree, Command};
    use checklist_core::{default_tree, CategoryId, SubcategoryId};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn parse_defaults_to_show() {
        assert_eq!(parse_command(&[]), Ok(Command::Show));
    }

    #[test]
    fn parse_reads_ids() {
        assert_eq!(
            parse_command(&args(&["toggle-category", "3"])),
            Ok(Command::ToggleCategory(CategoryId::new(3)))
        );
        assert_eq!(
            parse_command(&args(&["toggle-subcategory", "12"])),
            Ok(Command::ToggleSubcategory(SubcategoryId::new(12)))
        );
    }

    #[test]
    fn parse_rejects_missing_or_bad_ids() {
        assert!(parse_command(&args(&["open"])).is_err());
        assert!(parse_command(&args(&["open", "x"])).is_err());
        assert!(parse_command(&args(&["explode"])).is_err());
    }

    #[test]
    fn render_marks_partial_categories() {
        let mut tree = default_tree();
        tree.toggle_subcategory(SubcategoryId::new(1)).unwrap();

        let rendered = render_tree(&tree);
        assert!(rendered.starts_with("[-] all\n"));
        assert!(rendered.contains("> [-] #1 Продажи"));
        assert!(rendered.contains("[x] #1 Неразобранное #99CCFD"));
    }
}
