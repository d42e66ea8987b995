use crate::artifacts::index::{SIGNATURE, SUPPORTED_VERSIONS};
use crate::artifacts::index::decoder::IndexError;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use derive_new::new;
use std::io::{Read, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub marker: String,
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    /// Read and validate the 12-byte header.
    ///
    /// The marker must be exactly `DIRC` and the version one of
    /// [`SUPPORTED_VERSIONS`]; anything else aborts the whole parse.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, IndexError> {
        let mut marker = [0u8; 4];
        reader.read_exact(&mut marker).map_err(IndexError::header)?;
        let marker = String::from_utf8_lossy(&marker).into_owned();

        if marker != SIGNATURE {
            return Err(IndexError::BadSignature(marker));
        }

        let version = reader
            .read_u32::<NetworkEndian>()
            .map_err(IndexError::header)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(IndexError::UnsupportedVersion(version));
        }

        let entries_count = reader
            .read_u32::<NetworkEndian>()
            .map_err(IndexError::header)?;

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.marker.as_bytes())?;
        writer.write_u32::<NetworkEndian>(self.version)?;
        writer.write_u32::<NetworkEndian>(self.entries_count)?;

        Ok(())
    }
}
