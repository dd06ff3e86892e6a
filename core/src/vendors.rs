use std::sync::OnceLock;

use assetscout_common::ports::VendorRepository;
use mac_oui::Oui;
use pnet::datalink::MacAddr;
use tracing::warn;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

/// Prefixes answered when the bundled OUI database is unavailable or silent.
const FALLBACK_VENDORS: &[([u8; 3], &str)] = &[
    ([0x00, 0x50, 0x56], "VMware"),
    ([0x00, 0x0c, 0x29], "VMware"),
    ([0x00, 0x05, 0x69], "VMware"),
    ([0x08, 0x00, 0x27], "VirtualBox"),
    ([0x00, 0x1c, 0x42], "Parallels"),
    ([0x00, 0x21, 0x70], "Apple"),
    ([0x00, 0x23, 0x12], "Apple"),
    ([0x00, 0x25, 0x00], "Apple"),
    ([0x00, 0x25, 0x4b], "Apple"),
    ([0x00, 0x26, 0x08], "Apple"),
    ([0x00, 0x26, 0x4a], "Apple"),
    ([0x00, 0x26, 0xbb], "Apple"),
    ([0xa4, 0xc3, 0xf0], "Apple"),
    ([0xac, 0xde, 0x48], "Apple"),
    ([0xb8, 0x27, 0xeb], "Raspberry Pi Foundation"),
    ([0xdc, 0xa6, 0x32], "Raspberry Pi Foundation"),
    ([0xe4, 0x5f, 0x01], "Raspberry Pi Foundation"),
    ([0x00, 0x1b, 0x44], "Cisco"),
    ([0x00, 0x1e, 0x13], "Cisco"),
    ([0x00, 0x23, 0xac], "Cisco"),
    ([0x00, 0x26, 0xca], "Cisco"),
    ([0x00, 0x50, 0xf2], "Microsoft"),
    ([0x00, 0x15, 0x5d], "Microsoft"),
    ([0x00, 0x0d, 0x3a], "Microsoft"),
    ([0x00, 0x03, 0xff], "Microsoft"),
    ([0x00, 0x1d, 0xd8], "Belkin"),
    ([0x00, 0x24, 0x01], "Belkin"),
    ([0x00, 0x22, 0x75], "D-Link"),
    ([0x00, 0x1b, 0x11], "D-Link"),
    ([0x00, 0x26, 0x5a], "D-Link"),
    ([0x00, 0x11, 0x95], "D-Link"),
    ([0x00, 0x1e, 0x58], "TP-Link"),
    ([0x00, 0x21, 0x91], "TP-Link"),
    ([0x00, 0x27, 0x19], "TP-Link"),
    ([0x00, 0x1d, 0x0f], "HP"),
    ([0x00, 0x1e, 0x68], "HP"),
    ([0x00, 0x21, 0x5a], "HP"),
    ([0x00, 0x23, 0x7d], "HP"),
    ([0x00, 0x25, 0xb3], "HP"),
    ([0x00, 0x1a, 0x79], "Lenovo"),
    ([0x00, 0x21, 0x86], "Lenovo"),
    ([0x00, 0x25, 0x90], "Lenovo"),
];

fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("OUI database unavailable, using built-in vendor table: {e:?}");
                None
            }
        })
        .as_ref()
}

pub struct MacOuiRepo;

impl MacOuiRepo {
    fn lookup_database(mac: MacAddr) -> Option<String> {
        let db = get_oui_db()?;
        match db.lookup_by_mac(&mac.to_string()) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            _ => None,
        }
    }
}

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac: MacAddr) -> Option<String> {
        Self::lookup_database(mac).or_else(|| fallback_vendor(mac).map(str::to_string))
    }
}

pub fn fallback_vendor(mac: MacAddr) -> Option<&'static str> {
    let prefix = [mac.0, mac.1, mac.2];
    FALLBACK_VENDORS
        .iter()
        .find(|(oui, _)| *oui == prefix)
        .map(|(_, vendor)| *vendor)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
