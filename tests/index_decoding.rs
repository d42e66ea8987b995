use common::index::{EntrySpec, index_bytes, record_len};
use gitdump::artifacts::index::decoder::{IndexDecoder, IndexError};
use gitdump::artifacts::index::index_entry::IndexEntry;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::Cursor;

mod common;

fn decode(bytes: Vec<u8>) -> Result<Vec<IndexEntry>, IndexError> {
    IndexDecoder::new(Cursor::new(bytes))
        .read_header()?
        .collect()
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-zA-Z0-9_.-]{1,12}(/[a-zA-Z0-9_.-]{1,12}){0,4}",
        1 => (4095usize..4200).prop_map(|len| "x".repeat(len)),
    ]
}

fn entry_strategy(version: u32) -> impl Strategy<Value = EntrySpec> {
    let extra_flags = if version == 3 {
        proptest::option::of(any::<u16>()).boxed()
    } else {
        Just(None).boxed()
    };

    (
        name_strategy(),
        "[0-9a-f]{40}",
        prop_oneof![Just(0o100644u32), Just(0o100755), Just(0o120000), Just(0o160000)],
        any::<bool>(),
        0u8..=3,
        extra_flags,
    )
        .prop_map(|(name, oid, mode, assume_valid, stage, extra_flags)| {
            let mut entry = EntrySpec::new(name, oid, mode);
            entry.assume_valid = assume_valid;
            entry.stage = stage;
            entry.extra_flags = extra_flags;
            entry
        })
}

fn index_strategy() -> impl Strategy<Value = (u32, Vec<EntrySpec>)> {
    prop_oneof![Just(2u32), Just(3u32)].prop_flat_map(|version| {
        (
            Just(version),
            proptest::collection::vec(entry_strategy(version), 0..6),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decoded_entries_match_what_was_written((version, specs) in index_strategy()) {
        let entries = decode(index_bytes(version, &specs)).unwrap();

        prop_assert_eq!(entries.len(), specs.len());
        for (number, (entry, spec)) in entries.iter().zip(&specs).enumerate() {
            prop_assert_eq!(entry.number as usize, number + 1);
            prop_assert_eq!(&entry.name, &spec.name);
            prop_assert_eq!(entry.oid.to_string(), spec.oid.clone());
            prop_assert_eq!(entry.metadata.mode.as_u32(), spec.mode);
            prop_assert_eq!(entry.metadata.flags.assume_valid(), spec.assume_valid);
            prop_assert_eq!(entry.stage(), spec.stage);
            prop_assert_eq!(entry.metadata.extra_flags, spec.extra_flags);
        }
    }

    #[test]
    fn records_stay_block_aligned((version, specs) in index_strategy()) {
        let entries = decode(index_bytes(version, &specs)).unwrap();

        for (entry, spec) in entries.iter().zip(&specs) {
            prop_assert_eq!(entry.record_len % 8, 0);
            prop_assert_eq!(entry.record_len, record_len(spec));
        }
    }

    #[test]
    fn truncated_index_never_yields_extra_entries(
        (version, specs) in index_strategy(),
        cut in 1usize..64,
    ) {
        let mut bytes = index_bytes(version, &specs);
        // drop the trailing checksum and part of the last record
        bytes.truncate(bytes.len() - 20);
        bytes.truncate(bytes.len().saturating_sub(cut).max(12));

        let entries = IndexDecoder::new(Cursor::new(bytes))
            .read_header()
            .unwrap()
            .collect::<Vec<_>>();

        prop_assert!(entries.len() <= specs.len());
        let errors = entries.iter().filter(|entry| entry.is_err()).count();
        prop_assert!(errors <= 1);
        if errors == 1 {
            prop_assert!(entries.last().unwrap().is_err());
        }
    }
}

#[test]
fn single_entry_is_decoded_from_raw_bytes() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"DIRC\x00\x00\x00\x02\x00\x00\x00\x01");
    // ctime, mtime, dev, ino
    bytes.extend_from_slice(&[0; 24]);
    bytes.extend_from_slice(&[0x00, 0x00, 0x81, 0xa4]);
    bytes.extend_from_slice(&[0; 12]);
    bytes.extend_from_slice(&[
        0xda, 0x39, 0xa3, 0xee, 0x5e, 0x6b, 0x4b, 0x0d, 0x32, 0x55, 0xbf, 0xef, 0x95, 0x60, 0x18,
        0x90, 0xaf, 0xd8, 0x07, 0x09,
    ]);
    bytes.extend_from_slice(&[0x00, 0x05]);
    bytes.extend_from_slice(b"a.txt");
    bytes.extend_from_slice(&[0; 5]);

    let entries = decode(bytes).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "a.txt");
    assert_eq!(
        entries[0].oid.to_string(),
        "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    );
    assert_eq!(entries[0].metadata.mode.to_string(), "100644");
    assert_eq!(entries[0].record_len, 72);
}

#[test]
fn non_nul_padding_is_rejected() {
    let mut bytes = index_bytes(2, &[EntrySpec::file("a.txt", &"1".repeat(40))]);
    // 12 header bytes + 62 fixed + 5 name, the pad starts right after
    bytes[12 + 62 + 5] = b'x';

    let err = decode(bytes).unwrap_err();

    assert!(matches!(err, IndexError::CorruptPadding { entry: 1, .. }), "{err:?}");
}

#[test]
fn extended_bit_is_ignored_in_version_2() {
    let mut spec = EntrySpec::file("a.txt", &"2".repeat(40));
    spec.extra_flags = Some(0x2000);
    let mut bytes = index_bytes(3, &[spec]);
    // announced as version 2, the extra flags are read as the first name bytes
    bytes[7] = 2;

    let err = decode(bytes).unwrap_err();

    assert!(
        matches!(err, IndexError::CorruptPadding { entry: 1, offset: 67 }),
        "{err:?}"
    );
}
