use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use kanso::config::Config;
use kanso::controller::BoardController;
use kanso::core::board::{Board, BoardId, Role};
use kanso::core::task::{Lane, Priority, SubtaskId, Task, TaskDraft, TaskId};
use kanso::store::{DocumentStore, FileStore};
use kanso::view::BoardView;
use kanso::{klog, Error, Result};

/// Kanso - kanban task boards from the command line
#[derive(Parser, Debug)]
#[command(name = "kanso")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    KANSO_DEBUG=1     Enable debug logging (alternative to --debug)")]
struct Cli {
    /// Act as this user instead of the configured identity
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Enable debug logging (writes to ~/.kanso/kanso.log)
    #[arg(short = 'd', long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or set the configured identity and data directory
    Config {
        /// Set the acting user identity
        #[arg(long)]
        user: Option<String>,

        /// Set the data directory for board storage
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Board operations
    #[command(subcommand)]
    Board(BoardCommand),

    /// Board membership operations
    #[command(subcommand)]
    Member(MemberCommand),

    /// Task operations
    #[command(subcommand)]
    Task(TaskCommand),

    /// Subtask (checklist) operations
    #[command(subcommand)]
    Subtask(SubtaskCommand),
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// Create a new board owned by you
    Create {
        /// Board title
        title: String,

        /// Board description
        #[arg(short = 'D', long, default_value = "")]
        description: String,
    },

    /// List boards you own or are a member of
    List,

    /// Show a board's lanes, tasks, and overall progress
    Show {
        /// Board id (or unique prefix)
        board: String,
    },
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    /// Invite a user to a board (owner only)
    Add {
        /// Board id (or unique prefix)
        board: String,

        /// User identity to invite
        email: String,

        /// Granted role
        #[arg(long, default_value = "viewer")]
        role: Role,
    },

    /// Remove an invited member (owner only)
    Remove {
        /// Board id (or unique prefix)
        board: String,

        /// Member identity to remove
        email: String,
    },

    /// List a board's members
    List {
        /// Board id (or unique prefix)
        board: String,
    },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Add a task to a board
    Add {
        /// Board id (or unique prefix)
        board: String,

        /// Task title
        title: String,

        /// Task description
        #[arg(short = 'D', long, default_value = "")]
        description: String,

        /// Priority: low, medium, or high
        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Lane to create the task in: todo, in-progress, or done
        #[arg(short, long, default_value = "todo")]
        lane: Lane,
    },

    /// Drop a task onto a lane
    Move {
        /// Board id (or unique prefix)
        board: String,

        /// Task id (or unique prefix)
        task: String,

        /// Target lane: todo, in-progress, or done
        lane: Lane,
    },

    /// Manually set progress on a task without subtasks
    Progress {
        /// Board id (or unique prefix)
        board: String,

        /// Task id (or unique prefix)
        task: String,

        /// Percentage in [0,100]
        value: u8,
    },

    /// Assign a task to a board member (or clear with --clear)
    Assign {
        /// Board id (or unique prefix)
        board: String,

        /// Task id (or unique prefix)
        task: String,

        /// Member identity to assign
        email: Option<String>,

        /// Clear the assignment
        #[arg(long, conflicts_with = "email")]
        clear: bool,
    },

    /// Delete a task
    Rm {
        /// Board id (or unique prefix)
        board: String,

        /// Task id (or unique prefix)
        task: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SubtaskCommand {
    /// Add a checklist item to a task
    Add {
        /// Board id (or unique prefix)
        board: String,

        /// Task id (or unique prefix)
        task: String,

        /// Subtask title
        title: String,
    },

    /// Check or uncheck a checklist item
    Toggle {
        /// Board id (or unique prefix)
        board: String,

        /// Task id (or unique prefix)
        task: String,

        /// Subtask id (or unique prefix)
        subtask: String,
    },

    /// Remove a checklist item
    Rm {
        /// Board id (or unique prefix)
        board: String,

        /// Task id (or unique prefix)
        task: String,

        /// Subtask id (or unique prefix)
        subtask: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    kanso::log::init_with_debug(cli.debug);
    klog!("Kanso starting");

    let mut config = Config::load()?;
    if let Some(user) = &cli.user {
        config.user = Some(user.clone());
    }
    config.ensure_dirs()?;

    if let Command::Config { user, data_dir } = &cli.command {
        return run_config(config, user.clone(), data_dir.clone());
    }

    let user = config.effective_user().to_string();
    let store: Arc<dyn DocumentStore> = Arc::new(FileStore::open(&config.boards_path()?).await?);

    match cli.command {
        Command::Config { .. } => unreachable!("handled above"),
        Command::Board(cmd) => run_board(store, &user, cmd).await,
        Command::Member(cmd) => run_member(store, &user, cmd).await,
        Command::Task(cmd) => run_task(store, &user, cmd).await,
        Command::Subtask(cmd) => run_subtask(store, &user, cmd).await,
    }
}

fn run_config(mut config: Config, user: Option<String>, data_dir: Option<String>) -> Result<()> {
    let changed = user.is_some() || data_dir.is_some();
    if let Some(user) = user {
        config.user = Some(user);
    }
    if let Some(data_dir) = data_dir {
        config.data_dir = Some(data_dir);
    }
    if changed {
        config.save()?;
    }

    println!("user: {}", config.effective_user());
    println!("data: {}", config.boards_path()?.display());
    Ok(())
}

async fn run_board(store: Arc<dyn DocumentStore>, user: &str, cmd: BoardCommand) -> Result<()> {
    match cmd {
        BoardCommand::Create { title, description } => {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(Error::Validation("board title must not be empty".to_string()));
            }
            let board = Board::create(&title, &description, user);
            println!("Created board {} ({})", board.title, board.id.short());
            store.put_board(board).await
        }
        BoardCommand::List => {
            let boards = store.boards().await?;
            let mine: Vec<&Board> = boards.iter().filter(|b| b.can_view(user)).collect();
            if mine.is_empty() {
                println!("No boards. Create one with: kanso board create <title>");
                return Ok(());
            }
            for board in mine {
                let role = if board.is_owner(user) { "owner" } else { "member" };
                println!("{}  {:<24} [{}]", board.id.short(), board.title, role);
            }
            Ok(())
        }
        BoardCommand::Show { board } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let board = controller.board().await?;
            let tasks = controller.tasks().await?;

            let mut view = BoardView::new();
            view.replace_all(tasks);
            let summary = view.summary();

            println!("{} ({})", board.title, board.id.short());
            if !board.description.is_empty() {
                println!("{}", board.description);
            }
            println!(
                "Overall: {} of {} tasks completed, {}%",
                summary.finished, summary.total, summary.overall_percent
            );

            for lane in Lane::ALL {
                let lane_tasks = view.lane(lane);
                println!("\n{} ({})", lane.title(), lane_tasks.len());
                for task in lane_tasks {
                    print_task(task);
                }
            }
            Ok(())
        }
    }
}

async fn run_member(store: Arc<dyn DocumentStore>, user: &str, cmd: MemberCommand) -> Result<()> {
    match cmd {
        MemberCommand::Add { board, email, role } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store, board_id, user);
            controller.add_member(&email, role).await?;
            println!("Added {} as {}", email, role);
            Ok(())
        }
        MemberCommand::Remove { board, email } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store, board_id, user);
            controller.remove_member(&email).await?;
            println!("Removed {}", email);
            Ok(())
        }
        MemberCommand::List { board } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store, board_id, user);
            let board = controller.board().await?;
            println!("{:<32} owner", board.owner);
            for member in &board.members {
                println!("{:<32} {}", member.uid, member.role);
            }
            Ok(())
        }
    }
}

async fn run_task(store: Arc<dyn DocumentStore>, user: &str, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add {
            board,
            title,
            description,
            priority,
            lane,
        } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store, board_id, user);
            let task = controller
                .create_task(TaskDraft {
                    title,
                    description,
                    priority,
                    lane,
                    subtasks: Vec::new(),
                })
                .await?;
            println!("Created task {} in {}", task.id.short(), task.lane);
            Ok(())
        }
        TaskCommand::Move { board, task, lane } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let task_id = resolve_task(store.as_ref(), board_id, &task).await?;
            if controller.move_task(task_id, lane).await? {
                println!("Moved {} to {}", task_id.short(), lane);
            } else {
                println!("Task {} is already in {}", task_id.short(), lane);
            }
            Ok(())
        }
        TaskCommand::Progress { board, task, value } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let task_id = resolve_task(store.as_ref(), board_id, &task).await?;
            if controller.set_task_progress(task_id, value).await? {
                let task = controller.task(task_id).await?;
                println!("Progress set to {}% ({})", task.progress, task.lane);
            } else {
                println!("No change (checklist-driven task or same value)");
            }
            Ok(())
        }
        TaskCommand::Assign {
            board,
            task,
            email,
            clear,
        } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let task_id = resolve_task(store.as_ref(), board_id, &task).await?;
            if clear || email.is_none() {
                controller.assign_task(task_id, None).await?;
                println!("Assignment cleared");
            } else {
                let email = email.unwrap_or_default();
                controller.assign_task(task_id, Some(&email)).await?;
                println!("Assigned to {}", email);
            }
            Ok(())
        }
        TaskCommand::Rm { board, task, yes } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let task_id = resolve_task(store.as_ref(), board_id, &task).await?;
            let deleted = controller
                .delete_task(task_id, |task| yes || confirm_on_stdin(&task.title))
                .await?;
            if deleted {
                println!("Deleted task {}", task_id.short());
            } else {
                println!("Aborted");
            }
            Ok(())
        }
    }
}

async fn run_subtask(store: Arc<dyn DocumentStore>, user: &str, cmd: SubtaskCommand) -> Result<()> {
    match cmd {
        SubtaskCommand::Add { board, task, title } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let task_id = resolve_task(store.as_ref(), board_id, &task).await?;
            if controller.add_subtask(task_id, &title).await? {
                let task = controller.task(task_id).await?;
                println!(
                    "Added. Task is now {}% ({})",
                    task.progress, task.lane
                );
            } else {
                println!("Ignored: empty subtask title");
            }
            Ok(())
        }
        SubtaskCommand::Toggle {
            board,
            task,
            subtask,
        } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let task_id = resolve_task(store.as_ref(), board_id, &task).await?;
            let subtask_id = resolve_subtask(&controller.task(task_id).await?, &subtask)?;
            if controller.toggle_subtask(task_id, subtask_id).await? {
                let task = controller.task(task_id).await?;
                println!(
                    "Toggled. Task is now {}% ({})",
                    task.progress, task.lane
                );
            } else {
                println!("No such subtask");
            }
            Ok(())
        }
        SubtaskCommand::Rm {
            board,
            task,
            subtask,
        } => {
            let board_id = resolve_board(store.as_ref(), &board).await?;
            let controller = BoardController::new(store.clone(), board_id, user);
            let task_id = resolve_task(store.as_ref(), board_id, &task).await?;
            let subtask_id = resolve_subtask(&controller.task(task_id).await?, &subtask)?;
            if controller.remove_subtask(task_id, subtask_id).await? {
                let task = controller.task(task_id).await?;
                println!(
                    "Removed. Task is now {}% ({})",
                    task.progress, task.lane
                );
            } else {
                println!("No such subtask");
            }
            Ok(())
        }
    }
}

fn print_task(task: &Task) {
    let assignee = task
        .assigned_to_name
        .as_deref()
        .map(|n| format!(" @{}", n))
        .unwrap_or_default();
    println!(
        "  {}  [{:<6}] {:>3}%  {}{}",
        task.id.short(),
        task.priority,
        task.display_progress(),
        task.title,
        assignee
    );
    for subtask in &task.subtasks {
        let mark = if subtask.done { "x" } else { " " };
        println!("      [{}] {}  {}", mark, subtask.id.short(), subtask.title);
    }
}

fn confirm_on_stdin(title: &str) -> bool {
    print!("Delete task \"{}\"? [y/N] ", title);
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Resolve a board argument: full id or unique short prefix.
async fn resolve_board(store: &dyn DocumentStore, arg: &str) -> Result<BoardId> {
    if let Ok(id) = arg.parse::<BoardId>() {
        return Ok(id);
    }

    let boards = store.boards().await?;
    let matches: Vec<BoardId> = boards
        .iter()
        .filter(|b| b.id.to_string().starts_with(arg))
        .map(|b| b.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::Validation(format!("no board matches '{}'", arg))),
        _ => Err(Error::Validation(format!(
            "ambiguous board prefix '{}' ({} matches)",
            arg,
            matches.len()
        ))),
    }
}

/// Resolve a task argument: full id or unique short prefix.
async fn resolve_task(store: &dyn DocumentStore, board_id: BoardId, arg: &str) -> Result<TaskId> {
    if let Ok(id) = arg.parse::<TaskId>() {
        return Ok(id);
    }

    let tasks = store.tasks(board_id).await?;
    let matches: Vec<TaskId> = tasks
        .iter()
        .filter(|t| t.id.to_string().starts_with(arg))
        .map(|t| t.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::Validation(format!("no task matches '{}'", arg))),
        _ => Err(Error::Validation(format!(
            "ambiguous task prefix '{}' ({} matches)",
            arg,
            matches.len()
        ))),
    }
}

/// Resolve a subtask argument against a loaded task.
fn resolve_subtask(task: &Task, arg: &str) -> Result<SubtaskId> {
    if let Ok(id) = arg.parse::<SubtaskId>() {
        return Ok(id);
    }

    let matches: Vec<SubtaskId> = task
        .subtasks
        .iter()
        .filter(|s| s.id.to_string().starts_with(arg))
        .map(|s| s.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(Error::Validation(format!("no subtask matches '{}'", arg))),
        _ => Err(Error::Validation(format!(
            "ambiguous subtask prefix '{}' ({} matches)",
            arg,
            matches.len()
        ))),
    }
}
