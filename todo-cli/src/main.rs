use std::io::{self, BufRead, Write};
use todo_cli::{TaskError, TaskManager};

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock())
}

/// Runs the menu loop until the user picks Exit or stdin reaches EOF.
///
/// Written against `BufRead`/`Write` so tests can drive it with in-memory
/// buffers.
fn run(mut input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
    let mut manager = TaskManager::new();

    loop {
        display_menu(&mut out)?;
        let Some(choice) = prompt(&mut input, &mut out, "Enter your choice: ")? else {
            writeln!(out, "\nExiting application.")?;
            return Ok(());
        };
        match choice.as_str() {
            "1" => add_task(&mut manager, &mut input, &mut out)?,
            "2" => view_tasks(&manager, &mut out)?,
            "3" => update_task(&mut manager, &mut input, &mut out)?,
            "4" => delete_task(&mut manager, &mut input, &mut out)?,
            "5" => toggle_task(&mut manager, &mut input, &mut out)?,
            "6" => {
                writeln!(out, "Exiting application.")?;
                return Ok(());
            }
            _ => writeln!(
                out,
                "Error: Invalid choice. Please select a number from the menu."
            )?,
        }
    }
}

fn display_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n--- Todo Menu ---")?;
    writeln!(out, "1. Add Task")?;
    writeln!(out, "2. View All Tasks")?;
    writeln!(out, "3. Update Task")?;
    writeln!(out, "4. Delete Task")?;
    writeln!(out, "5. Toggle Task Completion")?;
    writeln!(out, "6. Exit")?;
    writeln!(out, "-----------------")
}

/// Prints `text` and reads one trimmed line. Returns `None` on EOF.
fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    text: &str,
) -> anyhow::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts until the user enters a valid number. Returns `None` on EOF.
fn prompt_id(
    input: &mut impl BufRead,
    out: &mut impl Write,
    text: &str,
) -> anyhow::Result<Option<u32>> {
    loop {
        let Some(raw) = prompt(input, out, text)? else {
            return Ok(None);
        };
        match raw.parse::<u32>() {
            Ok(id) => return Ok(Some(id)),
            Err(_) => writeln!(out, "Error: Please enter a valid number.")?,
        }
    }
}

fn add_task(
    manager: &mut TaskManager,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(title) = prompt(input, out, "Enter title: ")? else {
        return Ok(());
    };
    if title.is_empty() {
        writeln!(out, "Error: Title cannot be empty.")?;
        return Ok(());
    }
    let Some(description) = prompt(input, out, "Enter description (optional): ")? else {
        return Ok(());
    };
    match manager.add(&title, &description) {
        Ok(task) => writeln!(out, "Success: Task added with ID {}.", task.id())?,
        Err(TaskError::EmptyTitle) => writeln!(out, "Error: Title cannot be empty.")?,
    }
    Ok(())
}

fn view_tasks(manager: &TaskManager, out: &mut impl Write) -> anyhow::Result<()> {
    let tasks = manager.list();
    if tasks.is_empty() {
        writeln!(out, "Info: The task list is empty.")?;
        return Ok(());
    }
    writeln!(out, "\n--- Todo List ---")?;
    for task in tasks {
        let status = if task.completed() { "[X]" } else { "[ ]" };
        if task.description().is_empty() {
            writeln!(out, "{}. {} {}", task.id(), status, task.title())?;
        } else {
            writeln!(
                out,
                "{}. {} {} - {}",
                task.id(),
                status,
                task.title(),
                task.description()
            )?;
        }
    }
    writeln!(out, "-----------------")?;
    Ok(())
}

fn update_task(
    manager: &mut TaskManager,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(id) = prompt_id(input, out, "Enter ID of task to update: ")? else {
        return Ok(());
    };
    if manager.get(id).is_none() {
        writeln!(out, "Error: Task with ID {id} not found.")?;
        return Ok(());
    }
    let Some(new_title) = prompt(input, out, "Enter new title (leave blank to keep current): ")?
    else {
        return Ok(());
    };
    let Some(new_description) = prompt(
        input,
        out,
        "Enter new description (leave blank to keep current): ",
    )?
    else {
        return Ok(());
    };

    // Blank input keeps the current value.
    let title = (!new_title.is_empty()).then_some(new_title.as_str());
    let description = (!new_description.is_empty()).then_some(new_description.as_str());

    match manager.update(id, title, description) {
        Ok(Some(_)) => writeln!(out, "Success: Task {id} updated.")?,
        Ok(None) => writeln!(out, "Error: Task with ID {id} not found.")?,
        Err(TaskError::EmptyTitle) => writeln!(out, "Error: Title cannot be empty.")?,
    }
    Ok(())
}

fn delete_task(
    manager: &mut TaskManager,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(id) = prompt_id(input, out, "Enter ID of task to delete: ")? else {
        return Ok(());
    };
    if manager.delete(id) {
        writeln!(out, "Success: Task {id} deleted.")?;
    } else {
        writeln!(out, "Error: Task with ID {id} not found.")?;
    }
    Ok(())
}

fn toggle_task(
    manager: &mut TaskManager,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(id) = prompt_id(input, out, "Enter ID of task to toggle: ")? else {
        return Ok(());
    };
    match manager.toggle(id) {
        Some(task) => {
            let status = if task.completed() {
                "Complete"
            } else {
                "Incomplete"
            };
            writeln!(out, "Success: Task {} marked as {}.", task.id(), status)?;
        }
        None => writeln!(out, "Error: Task with ID {id} not found.")?,
    }
    Ok(())
}
