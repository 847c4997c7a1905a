use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::debug;

use crate::{
    constants::{AGENT_FRAGMENT, BOARD_FRAGMENT, HEADER_FILE_NAME},
    error::{AgentConfigError, AgentConfigResult},
};

/// Vendors and their boards, in menu order.
pub const SUPPORTED_BOARDS: &[(&str, &[&str])] = &[
    (
        "cypress",
        &[
            "CY8CKIT_064S0S2_4343W",
            "CYW943907AEVAL1F",
            "CYW954907AEVAL1F",
        ],
    ),
    ("espressif", &["esp32"]),
    (
        "infineon",
        &["xmc4800_iotkit", "xmc4800_plus_optiga_trust_x"],
    ),
    ("marvell", &["mw300_rd"]),
    ("mediatek", &["mt7697hx-dev-kit"]),
    (
        "microchip",
        &["curiosity_pic32mzef", "ecc608a_plus_winsim"],
    ),
    ("nordic", &["nrf52840-dk"]),
    ("nuvoton", &["numaker_iot_m487_wifi"]),
    ("nxp", &["lpc54018iotmodule"]),
    ("pc", &["linux", "windows"]),
    ("renesas", &["rx65n-rsk"]),
    ("st", &["stm32l475_discovery"]),
    ("ti", &["cc3220_launchpad"]),
    ("xilinx", &["microzed"]),
];

pub fn vendors() -> impl Iterator<Item = &'static str> {
    SUPPORTED_BOARDS.iter().map(|(vendor, _)| *vendor)
}

pub fn boards(vendor: &str) -> Option<&'static [&'static str]> {
    SUPPORTED_BOARDS
        .iter()
        .find(|(v, _)| *v == vendor)
        .map(|(_, boards)| *boards)
}

/// A vendor/board pair from [`SUPPORTED_BOARDS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSelection {
    vendor: String,
    board: String,
}

impl BoardSelection {
    pub fn new(vendor: impl Into<String>, board: impl Into<String>) -> AgentConfigResult<Self> {
        let vendor = vendor.into();
        let board = board.into();

        let known = boards(&vendor).is_some_and(|list| list.contains(&board.as_str()));
        if !known {
            return Err(AgentConfigError::UnknownBoard { vendor, board });
        }

        Ok(Self { vendor, board })
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn board(&self) -> &str {
        &self.board
    }

    /// `<root>/vendors/<vendor>/boards/<board>`
    pub fn board_dir(&self, root: &Path) -> PathBuf {
        root.join("vendors")
            .join(&self.vendor)
            .join("boards")
            .join(&self.board)
    }

    fn config_files_dir(&self, root: &Path) -> PathBuf {
        self.board_dir(root).join("aws_demos").join("config_files")
    }

    /// Board fragments in load order: the agent's library fragment, then the board
    /// properties, which take precedence over it.
    pub fn fragments(&self, root: &Path) -> Vec<PathBuf> {
        vec![
            self.config_files_dir(root).join(AGENT_FRAGMENT),
            self.board_dir(root).join(BOARD_FRAGMENT),
        ]
    }

    /// Where the generated header belongs.
    pub fn header_path(&self, root: &Path) -> PathBuf {
        self.config_files_dir(root).join(HEADER_FILE_NAME)
    }

    /// Persist the choice as a single `vendor,board` line.
    pub fn save(&self, path: &Path) -> AgentConfigResult<()> {
        fs::write(path, format!("{},{}", self.vendor, self.board))?;
        debug!(path = %path.display(), board = %self, "saved board choice");
        Ok(())
    }

    /// Read back a saved choice; `None` when nothing has been chosen yet.
    pub fn load(path: &Path) -> AgentConfigResult<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }

        let record = fs::read_to_string(path)?;
        let (vendor, board) = record.trim().split_once(',').ok_or_else(|| {
            AgentConfigError::invalid_board_record(format!(
                "expected 'vendor,board', found '{}'",
                record.trim()
            ))
        })?;

        Self::new(vendor.trim(), board.trim()).map(Some)
    }
}

impl fmt::Display for BoardSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.board)
    }
}
