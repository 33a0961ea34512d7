#![allow(dead_code)]

/// Parsed member: (name, mtime, uid, gid, mode, data).
pub struct Member {
    pub name: String,
    pub mtime: u64,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub data: Vec<u8>,
}

fn field(hdr: &[u8]) -> &str {
    std::str::from_utf8(hdr).unwrap().trim_end_matches(' ')
}

/// Strict reader for the ar subset the encoder writes. Panics on anything else.
pub fn decode_ar(buf: &[u8]) -> Vec<Member> {
    assert_eq!(&buf[..8], b"!<arch>\n", "missing magic");
    let mut off = 8;
    let mut out = Vec::new();
    while off < buf.len() {
        assert_eq!(off % 2, 0, "member at odd offset {off}");
        let hdr = &buf[off..off + 60];
        assert_eq!(&hdr[58..60], b"`\n", "bad terminator");
        let size: usize = field(&hdr[48..58]).parse().unwrap();
        let start = off + 60;
        out.push(Member {
            name: field(&hdr[0..16]).to_string(),
            mtime: field(&hdr[16..28]).parse().unwrap(),
            uid: field(&hdr[28..34]).parse().unwrap(),
            gid: field(&hdr[34..40]).parse().unwrap(),
            mode: u32::from_str_radix(field(&hdr[40..48]), 8).unwrap(),
            data: buf[start..start + size].to_vec(),
        });
        off = start + size;
        if off % 2 != 0 {
            assert_eq!(buf[off], b'\n', "pad byte must be newline");
            off += 1;
        }
    }
    assert_eq!(off, buf.len());
    out
}
