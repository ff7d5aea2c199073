//! eatool: 读、写、删除文件的扩展属性
//!
//! ```text
//! eatool -r FILE [NAME]        读取全部 EA 或指定 EA
//! eatool -w FILE NAME VALUE    把 NAME 设为 ASCII 值 VALUE
//! eatool -d FILE [NAME]        删除全部 EA 或指定 EA
//! ```
//!
//! 任何失败都以退出码 3 结束，诊断信息输出到标准错误。
//! 日志由 `RUST_LOG` 控制。

#[path = "common/dump.rs"]
mod dump;

use clap::{ArgGroup, CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_FAILURE: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "eatool",
    about = "Read, write or delete extended attributes of a file",
    version
)]
#[command(group(ArgGroup::new("mode").required(true).args(["read", "write", "delete"])))]
struct Cli {
    /// Read all EAs, or the EA named NAME
    #[arg(short = 'r')]
    read: bool,

    /// Set the EA named NAME to the ASCII value VALUE
    #[arg(short = 'w')]
    write: bool,

    /// Delete all EAs, or the EA named NAME
    #[arg(short = 'd')]
    delete: bool,

    /// Target file
    file: PathBuf,

    /// EA name
    name: Option<String>,

    /// EA value (write only)
    #[arg(allow_hyphen_values = true)]
    value: Option<String>,

    /// Host xattr namespace the EAs live in
    #[arg(long, default_value = "user.")]
    prefix: String,

    /// Operate on a symlink itself rather than its target
    #[arg(long)]
    no_dereference: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    ReadAll,
    Read(String),
    Write(String, String),
    DeleteAll,
    Delete(String),
}

impl Cli {
    fn action(&self) -> Option<Action> {
        match (self.read, self.write, self.delete) {
            (true, _, _) if self.value.is_none() => Some(match &self.name {
                Some(name) => Action::Read(name.clone()),
                None => Action::ReadAll,
            }),
            (_, true, _) => match (&self.name, &self.value) {
                (Some(name), Some(value)) => Some(Action::Write(name.clone(), value.clone())),
                _ => None,
            },
            (_, _, true) if self.value.is_none() => Some(match &self.name {
                Some(name) => Action::Delete(name.clone()),
                None => Action::DeleteAll,
            }),
            _ => None,
        }
    }
}

fn usage() -> ExitCode {
    let mut cmd = Cli::command();
    eprintln!("{}", cmd.render_usage());
    eprintln!("\tr: Read   (all EAs or the EA named NAME)");
    eprintln!("\tw: Write  (sets the value of NAME to VALUE)");
    eprintln!("\td: Delete (all EAs or the EA named NAME)");
    ExitCode::from(EXIT_FAILURE)
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help / --version
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return usage();
        }
    };
    let Some(action) = cli.action() else {
        return usage();
    };

    match run(&cli, action) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error:");
            eprintln!("   {}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(all(unix, feature = "xattr"))]
fn run(cli: &Cli, action: Action) -> Result<(), Box<dyn std::error::Error>> {
    use ea_core::{Ea, EaList, FileRef, StoreConfig, XattrStore};
    use std::io::Write;

    let mut store = XattrStore::new(StoreConfig {
        namespace: cli.prefix.clone(),
        follow_symlinks: !cli.no_dereference,
    });
    let file = FileRef::Path(&cli.file);
    log::debug!("eatool {:?} on {}", action, file);

    match action {
        Action::ReadAll => {
            let mut list = EaList::new();
            list.read_all(&store, file)?;
            let mut out = std::io::stdout().lock();
            dump::dump_list(&mut out, &list, 0)?;
            out.flush()?;
        }
        Action::Read(name) => {
            let mut ea = Ea::named(&name);
            ea.read(&store, file)?;
            let mut out = std::io::stdout().lock();
            dump::dump_ea(&mut out, &ea, 0)?;
            out.flush()?;
        }
        Action::Write(name, value) => Ea::ascii(&name, &value).write(&mut store, file)?,
        Action::DeleteAll => EaList::new().remove_all(&mut store, file)?,
        Action::Delete(name) => Ea::named(&name).remove(&mut store, file)?,
    }
    Ok(())
}

#[cfg(not(all(unix, feature = "xattr")))]
fn run(_cli: &Cli, _action: Action) -> Result<(), Box<dyn std::error::Error>> {
    Err("host extended attributes are not supported in this build".into())
}
