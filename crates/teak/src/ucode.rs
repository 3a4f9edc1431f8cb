//! Identification of known ucodes by a checksum of program memory.

use strum::{Display, IntoStaticStr};

/// Size in bytes of the program memory view that is hashed.
pub const PROGRAM_VIEW_LEN: usize = 0x40000;

/// Size in bytes of a single hashed window. Matches the bank granularity of shared memory.
pub const WINDOW_LEN: usize = 0x8000;

const WINDOWS: usize = PROGRAM_VIEW_LEN / WINDOW_LEN;

/// Stand-in for windows with no memory behind them.
static ZERO_WINDOW: [u8; WINDOW_LEN] = [0; WINDOW_LEN];

/// A known ucode. Graphics ucodes handle image scaling and yuv conversion, G711 ones audio
/// encoding, and AAC ones audio decoding.
#[derive(Debug, Display, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UcodeId {
    #[strum(to_string = "AAC (sound app)")]
    AacSoundApp,
    #[strum(to_string = "AAC (SDK v0)")]
    AacSdkV0,
    #[strum(to_string = "graphics (SDK v0)")]
    GraphicsSdkV0,
    #[strum(to_string = "G711 (SDK v1)")]
    G711SdkV1,
    #[strum(to_string = "graphics (SDK v1)")]
    GraphicsSdkV1,
    #[strum(to_string = "graphics (SDK v1, patched)")]
    GraphicsSdkV1Patch,
    #[strum(to_string = "G711 (SDK v2)")]
    G711SdkV2,
    #[strum(to_string = "graphics (SDK v2)")]
    GraphicsSdkV2,
    #[strum(to_string = "G711 (SDK v3)")]
    G711SdkV3,
    #[strum(to_string = "graphics (SDK v3)")]
    GraphicsSdkV3,
    #[strum(to_string = "G711 (SDK v4)")]
    G711SdkV4,
    #[strum(to_string = "graphics (SDK v4)")]
    GraphicsSdkV4,
    #[strum(to_string = "G711 (SDK v5)")]
    G711SdkV5,
    #[strum(to_string = "graphics (SDK v5)")]
    GraphicsSdkV5,
    #[strum(to_string = "unknown")]
    Unknown,
}

/// Checksums of the known ucodes.
const SIGNATURES: [(u32, UcodeId); 14] = [
    (0x7867_C94B, UcodeId::AacSoundApp),
    (0x0CAF_EF48, UcodeId::AacSdkV0),
    (0xCD2A_8B1B, UcodeId::GraphicsSdkV0),
    (0x7EEE_19FE, UcodeId::G711SdkV1),
    (0x7323_B75B, UcodeId::GraphicsSdkV1),
    (0xBD4B_63B6, UcodeId::GraphicsSdkV1Patch),
    (0x6056_C6FF, UcodeId::G711SdkV2),
    (0x448B_B6A2, UcodeId::GraphicsSdkV2),
    (0x2C28_1DAE, UcodeId::G711SdkV3),
    (0x63CA_EC33, UcodeId::GraphicsSdkV3),
    (0x2A1D_7F94, UcodeId::G711SdkV4),
    (0x1451_EB84, UcodeId::GraphicsSdkV4),
    (0x4EBE_B519, UcodeId::G711SdkV5),
    (0x2C97_4FC8, UcodeId::GraphicsSdkV5),
];

impl UcodeId {
    pub fn from_checksum(crc: u32) -> Self {
        SIGNATURES
            .iter()
            .find(|(sig, _)| *sig == crc)
            .map_or(Self::Unknown, |(_, id)| *id)
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

/// Computes the checksum of a program view given as its windows, in ascending address order.
/// `None` windows are unmapped and hash as zeroes. Windows shorter than [`WINDOW_LEN`] are
/// padded with zeroes and missing trailing windows are treated as unmapped.
pub fn checksum_windows<'a>(windows: impl IntoIterator<Item = Option<&'a [u8]>>) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    let mut windows = windows.into_iter();

    for _ in 0..WINDOWS {
        let window = windows.next().flatten().unwrap_or(&ZERO_WINDOW[..]);
        let window = &window[..window.len().min(WINDOW_LEN)];

        hasher.update(window);
        hasher.update(&ZERO_WINDOW[window.len()..]);
    }

    hasher.finalize()
}

/// Computes the checksum of a contiguous program view.
pub fn checksum(view: &[u8]) -> u32 {
    checksum_windows(view.chunks(WINDOW_LEN).map(Some))
}

/// Identifies the ucode in a contiguous program view.
pub fn identify(view: &[u8]) -> UcodeId {
    let crc = checksum(view);
    let id = UcodeId::from_checksum(crc);
    if id.is_known() {
        tracing::info!("identified {id} ucode");
    } else {
        tracing::debug!("unknown ucode (crc {crc:08X})");
    }

    id
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_view_is_unknown() {
        let view = vec![0u8; PROGRAM_VIEW_LEN];
        let expected = crc32fast::hash(&view);

        assert_eq!(checksum(&view), expected);
        assert_eq!(identify(&view), UcodeId::Unknown);
    }

    #[test]
    fn unmapped_windows_hash_as_zero() {
        let mut view = vec![0u8; PROGRAM_VIEW_LEN];
        view[..4].copy_from_slice(&[0x12, 0x34, 0x56, 0x78]);

        let first = &view[..WINDOW_LEN];
        let sparse = checksum_windows([Some(first), None, None]);
        assert_eq!(sparse, checksum(&view));
        assert_eq!(checksum(&view[..WINDOW_LEN + 3]), checksum(&view));
    }

    #[test]
    fn checksum_carries_across_windows() {
        let mut view = vec![0u8; PROGRAM_VIEW_LEN];
        view[WINDOW_LEN * 7] = 1;

        let mut swapped = vec![0u8; PROGRAM_VIEW_LEN];
        swapped[0] = 1;

        assert_ne!(checksum(&view), checksum(&swapped));
    }

    #[test]
    fn deterministic() {
        let view: Vec<u8> = (0..PROGRAM_VIEW_LEN).map(|i| (i * 7) as u8).collect();
        assert_eq!(identify(&view), identify(&view));
        assert_eq!(checksum(&view), checksum(&view));
    }

    #[test]
    fn known_signatures() {
        assert_eq!(UcodeId::from_checksum(0x2C97_4FC8), UcodeId::GraphicsSdkV5);
        assert_eq!(UcodeId::from_checksum(0x7867_C94B), UcodeId::AacSoundApp);
        assert_eq!(UcodeId::from_checksum(0), UcodeId::Unknown);
        assert_eq!(UcodeId::G711SdkV3.to_string(), "G711 (SDK v3)");
    }
}
