#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;
use std::{env, fs, path::Path};
use fs_mistrust::Mistrust;
use std::os::unix::fs::PermissionsExt;
use lazy_static::lazy_static;
use structopt::StructOpt;

// Fruit Utilities
use crate::utils::{fruit_utils, errors::Errors};

use super::fruit_utils::get_absolute_path;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_FRUIT_ROOT_DIR   : &str = "FRUIT_ROOT_DIR";
const DEFAULT_ROOT_DIR     : &str = "~/.fruit_server";
const CONFIG_DIR           : &str = "/config";
const LOGS_DIR             : &str = "/logs";
const LOG4RS_CONFIG_FILE   : &str = "/log4rs.yml";       // relative to config dir
const FRUIT_CONFIG_FILE    : &str = "/fruit_server.toml"; // relative to config dir

// Networking.
const DEFAULT_HTTP_ADDR    : &str = "http://localhost";
const DEFAULT_HTTP_PORT    : u16  = 3000;

// Console pattern used when no log4rs file is installed.
const DEFAULT_LOG_PATTERN  : &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} {h({l:5})} {t} - {m}{n}";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref FRUIT_ARGS: FruitArgs = init_fruit_args();
}

// Calculate the data directories BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref FRUIT_DIRS: FruitDirs = init_fruit_dirs();
}

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// FruitDirs:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct FruitDirs {
    pub root_dir: String,
    pub config_dir: String,
    pub logs_dir: String,
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// FruitArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "fruit_args", about = "Command line arguments for the fruit server.")]
pub struct FruitArgs {
    /// Specify the server's root data directory.
    ///
    /// This directory contains the config and logs subdirectories.
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Create the data directories and then exit.
    ///
    /// The data directories will be rooted at a root directory calculated
    /// using the following priority order:
    ///
    ///   1. If set, the value of the FRUIT_ROOT_DIR environment,
    ///
    ///   2. Otherwise, if set, the value of the --root-dir command line argument,
    ///
    ///   3. Otherwise, ~/.fruit_server
    ///
    #[structopt(short, long)]
    pub create_dirs_only: bool,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub fruit_args: &'static FruitArgs,
    pub fruit_dirs: &'static FruitDirs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    /// The externally visible base url, used in the OpenAPI document.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.http_addr, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Fruit Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_fruit_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_fruit_args() -> FruitArgs {
    let args = FruitArgs::from_args();
    println!("{:?}", args);
    args
}

// ---------------------------------------------------------------------------
// init_fruit_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories, creating any that are missing.
 * The application cannot run without them, so any failure aborts.
 */
fn init_fruit_dirs() -> FruitDirs {
    match create_fruit_dirs(&get_root_dir()) {
        Ok(d) => d,
        Err(e) => panic!("{}", e),
    }
}

// ---------------------------------------------------------------------------
// create_fruit_dirs:
// ---------------------------------------------------------------------------
fn create_fruit_dirs(root_dir: &str) -> Result<FruitDirs> {
    // Initialize the mistrust object.
    let mistrust = get_mistrust()?;

    // Check that each path is absolute and is a directory with the
    // proper permission assign if it exists.  If it doesn't exist,
    // create it.
    let root_dir = root_dir.to_string();
    check_fruit_dir(&root_dir, "root directory", &mistrust)?;

    let config_dir = root_dir.clone() + CONFIG_DIR;
    check_fruit_dir(&config_dir, "config directory", &mistrust)?;

    let logs_dir = root_dir.clone() + LOGS_DIR;
    check_fruit_dir(&logs_dir, "logs directory", &mistrust)?;

    // Package up and return the directories.
    Ok(FruitDirs { root_dir, config_dir, logs_dir })
}

// ---------------------------------------------------------------------------
// check_fruit_dir:
// ---------------------------------------------------------------------------
/** Check that the path is absolute and, if it exists, that is has the proper
 * permissions assigned.  If it doesn't exist, create it.  The mistrust package
 * creates directories with 0o700 permissions.
 */
fn check_fruit_dir(dir: &str, msgname: &str, mistrust: &Mistrust) -> Result<()> {
    // Get the path object.
    let path = Path::new(dir);
    if !path.is_absolute() {
        return Err(anyhow!("The fruit server {} path must be absolute: {}", msgname, dir));
    }
    if path.exists() {
        // Make sure the path represents a directory.
        if !path.is_dir() {
            return Err(anyhow!("The fruit server {} path must be a directory: {}", msgname, dir));
        }

        // Make sure the directory had rwx for owner only.
        let perm = path.metadata()?.permissions().mode();
        if perm & 0o777 != 0o700 {
            return Err(anyhow!("The fruit server {} path must have 0o700 permissions: {}", msgname, dir));
        }
    } else {
        // Create the directory with the correct permissions.
        if let Err(e) = mistrust.make_directory(path) {
            return Err(anyhow!("Make directory error for {:?}: {}", path, e));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// get_mistrust:
// ---------------------------------------------------------------------------
/** Configure a new mistrust object for initial directory processing. */
fn get_mistrust() -> Result<Mistrust> {
    match Mistrust::builder()
        .ignore_prefix(get_absolute_path("~"))
        .trust_group(0)
        .build() {
            Ok(m) => Ok(m),
            Err(e) => Err(anyhow!("Mistrust configuration error: {}", e)),
        }
}

// ---------------------------------------------------------------------------
// get_root_dir:
// ---------------------------------------------------------------------------
fn get_root_dir() -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env::var(ENV_FRUIT_ROOT_DIR).unwrap_or_else(
        |_| {
            match FRUIT_ARGS.root_dir.clone() {
                Some(r) => r,
                None => DEFAULT_ROOT_DIR.to_string(),
            }
        });

    // Canonicalize the path.
    get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the installed configuration file, or log to the
 * console at info level when there is no such file.
 */
pub fn init_log() -> Result<()> {
    let logconfig = init_log_config();
    if Path::new(&logconfig).is_file() {
        if let Err(e) = log4rs::init_file(&logconfig, Default::default()) {
            println!("{}", e);
            return Err(anyhow!("{}", Errors::Log4rsInitialization(logconfig)));
        }
        info!("Log4rs initialized using: {}", logconfig);
    } else {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
            .build();
        let config = LogConfig::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
        log4rs::init_config(config)?;
        info!("Log4rs file not found at {}, logging to console.", logconfig);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// init_log_config:
// ---------------------------------------------------------------------------
fn init_log_config() -> String {
    FRUIT_DIRS.config_dir.clone() + LOG4RS_CONFIG_FILE
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config directory.  If the file cannot be read, default values are used.
 */
fn get_parms() -> Result<Parms> {
    let config_file = FRUIT_DIRS.config_dir.clone() + FRUIT_CONFIG_FILE;
    read_parms(&fruit_utils::get_absolute_path(&config_file))
}

// ---------------------------------------------------------------------------
// read_parms:
// ---------------------------------------------------------------------------
fn read_parms(config_file_abs: &str) -> Result<Parms> {
    // Read the configuration file.
    info!("{}", Errors::ReadingConfigFile(config_file_abs.to_string()));
    let contents = match fs::read_to_string(config_file_abs) {
        Ok(c) => c,
        Err(_) => {
            println!("Unable to read configuration at {}. Using default values.", config_file_abs);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
    };

    // Parse the toml configuration.
    let config : Config = match toml::from_str(&contents) {
        Ok(c)  => c,
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file_abs.to_string()), e);
            error!("{}", msg);
            return Result::Err(anyhow!(msg));
        }
    };

    Ok(Parms { config_file: config_file_abs.to_string(), config })
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // The application aborts if the configuration cannot be parsed.
    let parms = match get_parms() {
        Ok(p) => p,
        Err(e) => panic!("FAILED to read configuration file: {}", e),
    };
    RuntimeCtx {parms, fruit_args: &FRUIT_ARGS, fruit_dirs: &FRUIT_DIRS}
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> String {
        let dir = env::temp_dir().join(format!("fruit_server_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.to_string_lossy().to_string()
    }

    #[test]
    fn default_config() {
        let config = Config::new();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.base_url(), "http://localhost:3000");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("http_port = 8080").unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.title, "Fruit Server");
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let parms = read_parms("/nonexistent/fruit_server.toml").unwrap();
        assert_eq!(parms.config_file, "");
        assert_eq!(parms.config.http_port, 3000);
    }

    #[test]
    fn bad_config_file_is_an_error() {
        let dir = scratch_dir("badcfg");
        fs::create_dir_all(&dir).unwrap();
        let file = format!("{}/fruit_server.toml", dir);
        fs::write(&file, "http_port = \"not a number\"").unwrap();
        assert!(read_parms(&file).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn relative_root_dir_is_rejected() {
        assert!(create_fruit_dirs("relative/root").is_err());
    }
}
