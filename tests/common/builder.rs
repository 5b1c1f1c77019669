// Byte-Bausteine fuer handgebaute Fast-Infoset-Dokumente.
//
// Wird per `include!` eingebunden.

const SIGNATURE: [u8; 4] = [0xE0, 0x00, 0x00, 0x01];

/// Baut ein Dokument Oktett fuer Oktett zusammen.
#[derive(Default)]
struct Bytes(Vec<u8>);

#[allow(dead_code)]
impl Bytes {
    fn new() -> Self {
        Self::default()
    }

    /// Signatur und Optional-Components-Oktett.
    fn header(self, components: u8) -> Self {
        self.raw(&SIGNATURE).raw(&[components])
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    /// Identifizierender Literalstring bzw. Oktettstring ab dem zweiten Bit.
    fn ident(self, s: &str) -> Self {
        let n = s.len();
        let head = match n {
            1..=64 => vec![(n - 1) as u8],
            65..=320 => vec![0x40, (n - 65) as u8],
            _ => panic!("ident: Laenge {n} nicht unterstuetzt"),
        };
        self.raw(&head).raw(s.as_bytes())
    }

    /// Nicht-identifizierender UTF-8-String (Laenge ab dem fuenften Bit).
    fn value(self, s: &str, add_to_table: bool) -> Self {
        let flag = if add_to_table { 0x40 } else { 0x00 };
        let n = s.len();
        let head = match n {
            1..=8 => vec![flag | (n - 1) as u8],
            9..=264 => vec![flag | 0x08, (n - 9) as u8],
            _ => panic!("value: Laenge {n} nicht unterstuetzt"),
        };
        self.raw(&head).raw(s.as_bytes())
    }

    /// UTF-8-Zeichenchunk (Laenge ab dem siebten Bit).
    fn chunk(self, s: &str, add_to_table: bool) -> Self {
        let flag = if add_to_table { 0x10 } else { 0x00 };
        let n = s.len();
        let head = match n {
            1..=2 => vec![0x80 | flag | (n - 1) as u8],
            3..=258 => vec![0x82 | flag, (n - 3) as u8],
            _ => panic!("chunk: Laenge {n} nicht unterstuetzt"),
        };
        self.raw(&head).raw(s.as_bytes())
    }

    fn build(self) -> Vec<u8> {
        self.0
    }
}

/// Liefert hoechstens ein Byte pro `read`.
struct Trickle<'a>(&'a [u8]);

impl std::io::Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((&b, rest)), Some(slot)) => {
                *slot = b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
