//! Byte-exact CSV encoding.
//!
//! Output layout: UTF-8 byte-order mark, header row, one row per
//! member, CRLF after every row. Every field is double-quoted with
//! internal quotes doubled; the delimiter is a semicolon because a
//! comma collides with the decimal separator in several locales and
//! breaks naive spreadsheet import. Encoding is a pure function of
//! (ordered records, timestamp string).

use rollcall_common::{CsvDocument, MemberRecord, Snapshot, SystemError};

/// Fixed header row. Locale-independent so exports from differently
/// configured operators stay column-compatible.
pub const CSV_HEADER: [&str; 3] = ["Timestamp", "Username", "Discord-ID"];

/// Byte-order mark so spreadsheet imports detect UTF-8.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Encode the ordered member records into the final CSV bytes.
pub fn encode_rows(members: &[MemberRecord], timestamp: &str) -> Result<Vec<u8>, SystemError> {
    let mut buf = Vec::with_capacity(UTF8_BOM.len() + 64 * (members.len() + 1));
    buf.extend_from_slice(UTF8_BOM);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(buf);

    writer.write_record(CSV_HEADER).map_err(encoding_failed)?;
    for member in members {
        writer
            .write_record([timestamp, member.display_name.as_str(), member.id.as_str()])
            .map_err(encoding_failed)?;
    }

    writer
        .into_inner()
        .map_err(|e| SystemError::EncodingFailed(e.to_string().into()))
}

fn encoding_failed(err: csv::Error) -> SystemError {
    SystemError::EncodingFailed(Box::new(err))
}

/// Build the deliverable document: encoded bytes plus suggested filename.
pub fn build_document(
    snapshot: &Snapshot,
    filename_stamp: &str,
) -> Result<CsvDocument, SystemError> {
    Ok(CsvDocument {
        bytes: encode_rows(&snapshot.members, &snapshot.taken_at)?,
        filename: make_filename(&snapshot.group.name, filename_stamp),
    })
}

/// `snapshot_<group>_<stamp>.csv`, with the group name reduced to a
/// filesystem-safe character set.
pub fn make_filename(group_name: &str, filename_stamp: &str) -> String {
    format!("snapshot_{}_{filename_stamp}.csv", sanitize_name(group_name))
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}
