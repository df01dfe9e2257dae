//! Task management commands.

use chrono::NaiveDate;
use clap::Subcommand;
use focusdesk_core::workspace::{CreateTaskInput, OrderUpdate};
use focusdesk_core::{TaskPatch, TaskPriority, TaskStatus};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// todo, in-progress or completed (default: todo)
        #[arg(long)]
        status: Option<TaskStatus>,
        /// low, medium or high (default: medium)
        #[arg(long)]
        priority: Option<TaskPriority>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List tasks in display order
    List,
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        order: Option<i64>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Apply new order keys, e.g. `reorder task-a=500 task-b=1500`
    Reorder {
        /// Stop at the local collection; skip the remote batch write
        #[arg(long)]
        optimistic: bool,
        /// id=order pairs
        updates: Vec<String>,
    },
    /// Reassign contiguous order keys to the active tasks
    Renumber,
}

fn parse_order_updates(raw: &[String]) -> Result<Vec<OrderUpdate>, Box<dyn std::error::Error>> {
    raw.iter()
        .map(|pair| {
            let (id, order) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected id=order, got '{pair}'"))?;
            let order: i64 = order
                .parse()
                .map_err(|_| format!("'{order}' is not an integer order key"))?;
            Ok(OrderUpdate {
                id: id.to_string(),
                order,
            })
        })
        .collect()
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = super::build_context()?;

    match action {
        TaskAction::Create {
            title,
            description,
            status,
            priority,
            due,
        } => {
            let task = ctx.create_task(CreateTaskInput {
                title,
                description,
                status,
                priority,
                due_date: due,
            })?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List => {
            println!("{}", serde_json::to_string_pretty(ctx.tasks())?);
        }
        TaskAction::Get { id } => match ctx.tasks().iter().find(|t| t.id == id) {
            Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
            None => println!("Task not found: {id}"),
        },
        TaskAction::Update {
            id,
            title,
            description,
            status,
            priority,
            due,
            order,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
                priority,
                due_date: due,
                order,
            };
            if patch.is_empty() {
                return Err("nothing to update; pass at least one field flag".into());
            }
            ctx.update_task(&id, patch)?;
            let task = ctx.tasks().iter().find(|t| t.id == id);
            println!("Task updated:");
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            ctx.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::Reorder {
            optimistic,
            updates,
        } => {
            if updates.is_empty() {
                return Err("pass at least one id=order pair".into());
            }
            let updates = parse_order_updates(&updates)?;
            ctx.reorder_tasks(&updates, optimistic)?;
            println!("{}", serde_json::to_string_pretty(ctx.tasks())?);
        }
        TaskAction::Renumber => {
            let updates = ctx.renumber_orders()?;
            println!("Renumbered {} tasks", updates.len());
            println!("{}", serde_json::to_string_pretty(&updates)?);
        }
    }
    Ok(())
}
