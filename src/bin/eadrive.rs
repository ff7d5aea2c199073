//! eadrive: 交互式测试驱动程序
//!
//! 围绕“当前文件、当前 EA、当前 EA 集合”三个状态的菜单循环。
//! 每个操作的错误都会输出，循环继续。`--memory` 使用进程内存储，
//! 不触碰真实文件。

#[path = "common/dump.rs"]
mod dump;

use clap::Parser;
use ea_core::{AttributeStore, Ea, EaList, FileRef, MemoryStore};
use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

type DriveResult<T> = Result<T, Box<dyn StdError>>;

const MENU: &str = "\
Select:

1 filename       8 write  EA   b write  list
2 create EA      9 remove EA   c remove list
3 create EAList  a read   EA   d remove all
4 EAList->EA                   e read list
5 EA->EAList                   f read all
6 print EA                     g dump to file
7 print EAList                 h read from file
q quit";

#[derive(Parser, Debug)]
#[command(name = "eadrive", about = "Interactive driver for the EA library", version)]
struct Cli {
    /// Use an in-process attribute store instead of host xattrs
    #[arg(long)]
    memory: bool,

    /// Initial target file
    file: Option<PathBuf>,
}

struct Driver<S, R, W> {
    store: S,
    register: fn(&mut S, &Path),
    input: R,
    out: W,
    file: Option<PathBuf>,
    ea: Ea,
    list: EaList,
}

impl<S: AttributeStore, R: BufRead, W: Write> Driver<S, R, W> {
    fn new(store: S, register: fn(&mut S, &Path), input: R, out: W) -> Self {
        Self {
            store,
            register,
            input,
            out,
            file: None,
            ea: Ea::ascii("DUMMY", "dummy"),
            list: EaList::new(),
        }
    }

    fn set_file(&mut self, path: PathBuf) {
        (self.register)(&mut self.store, &path);
        self.file = Some(path);
    }

    /// 读一行输入（去掉行尾）；输入结束时返回 `None`
    fn line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, text: &str) -> DriveResult<String> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(self.line()?.unwrap_or_default())
    }

    fn target(&self) -> DriveResult<PathBuf> {
        self.file.clone().ok_or_else(|| "no file selected (use 1)".into())
    }

    fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "Test driver for EAs:\n")?;
        loop {
            writeln!(self.out, "{}", MENU)?;
            self.out.flush()?;
            let Some(answer) = self.line()? else {
                return Ok(());
            };
            let Some(choice) = answer.trim().chars().next() else {
                continue;
            };
            if choice.eq_ignore_ascii_case(&'q') {
                return Ok(());
            }
            if let Err(err) = self.dispatch(choice) {
                log::debug!("command {} failed: {:?}", choice, err);
                writeln!(self.out, "Error: {}", err)?;
            }
        }
    }

    fn dispatch(&mut self, choice: char) -> DriveResult<()> {
        match choice {
            '1' => {
                let name = self.prompt("Enter filename:")?;
                self.set_file(PathBuf::from(name));
            }
            '2' => {
                let name = self.prompt("Enter name of EA:")?;
                let value = self.prompt("Enter value of EA:")?;
                self.ea = Ea::ascii(&name, &value);
            }
            '3' => {
                self.list.clear();
                loop {
                    let name = self.prompt("Enter name of EA:")?;
                    if name.is_empty() {
                        break;
                    }
                    let value = self.prompt("Enter value of EA:")?;
                    self.list.insert(Ea::ascii(&name, &value))?;
                }
            }
            '4' => self.ea = Ea::from_list("LIST", &self.list, 0)?,
            '5' => {
                let base = self.prompt("Enter basename for EAList:")?;
                self.list = EaList::from_multi(&base, &self.ea)?;
            }
            '6' => dump::dump_ea(&mut self.out, &self.ea, 0)?,
            '7' => dump::dump_list(&mut self.out, &self.list, 0)?,
            '8' => {
                let path = self.target()?;
                self.ea.write(&mut self.store, FileRef::Path(&path))?;
                writeln!(self.out, "EA successfully written!")?;
                dump::dump_ea(&mut self.out, &self.ea, 0)?;
            }
            '9' => {
                let path = self.target()?;
                self.ea.remove(&mut self.store, FileRef::Path(&path))?;
                writeln!(self.out, "EA successfully removed!")?;
            }
            'a' => {
                let path = self.target()?;
                self.ea.read(&self.store, FileRef::Path(&path))?;
                writeln!(self.out, "EA successfully read!")?;
                dump::dump_ea(&mut self.out, &self.ea, 0)?;
            }
            'b' => {
                let path = self.target()?;
                self.list.write(&mut self.store, FileRef::Path(&path))?;
                writeln!(self.out, "EAList successfully written!")?;
                dump::dump_list(&mut self.out, &self.list, 0)?;
            }
            'c' => {
                let path = self.target()?;
                self.list.remove(&mut self.store, FileRef::Path(&path))?;
                writeln!(self.out, "EAs from list successfully removed!")?;
            }
            'd' => {
                let path = self.target()?;
                self.list.remove_all(&mut self.store, FileRef::Path(&path))?;
                writeln!(self.out, "All EAs successfully removed!")?;
            }
            'e' => {
                let path = self.target()?;
                self.list.read(&self.store, FileRef::Path(&path))?;
                writeln!(self.out, "EAs read from list:")?;
                dump::dump_list(&mut self.out, &self.list, 0)?;
            }
            'f' => {
                let path = self.target()?;
                self.list.read_all(&self.store, FileRef::Path(&path))?;
                writeln!(self.out, "All EAs from file:")?;
                dump::dump_list(&mut self.out, &self.list, 0)?;
            }
            'g' => {
                let name = self.prompt("Enter filename to dump to:")?;
                let mut sink = BufWriter::new(File::create(&name)?);
                self.list.save_to(&mut sink)?;
                sink.flush()?;
                writeln!(self.out, "EAList written to file {}", name)?;
            }
            'h' => {
                let name = self.prompt("Enter filename to read from:")?;
                let mut source = BufReader::new(File::open(&name)?);
                self.list.load_from(&mut source)?;
                writeln!(self.out, "EAList from file {}:", name)?;
                dump::dump_list(&mut self.out, &self.list, 0)?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn drive<S: AttributeStore>(
    store: S,
    register: fn(&mut S, &Path),
    file: Option<PathBuf>,
) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut driver = Driver::new(store, register, stdin.lock(), stdout.lock());
    if let Some(file) = file {
        driver.set_file(file);
    }
    driver.run()
}

fn register_memory(store: &mut MemoryStore, path: &Path) {
    store.create_file(path);
}

#[cfg(all(unix, feature = "xattr"))]
fn drive_host(file: Option<PathBuf>) -> DriveResult<()> {
    use ea_core::{StoreConfig, XattrStore};
    Ok(drive(XattrStore::new(StoreConfig::default()), |_, _| {}, file)?)
}

#[cfg(not(all(unix, feature = "xattr")))]
fn drive_host(_file: Option<PathBuf>) -> DriveResult<()> {
    Err("host extended attributes are not supported in this build; use --memory".into())
}

fn main() -> DriveResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.memory {
        Ok(drive(MemoryStore::new(), register_memory, cli.file)?)
    } else {
        drive_host(cli.file)
    }
}
