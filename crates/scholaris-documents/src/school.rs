use crate::pdf::PdfWriter;

/// School identity printed at the top of every document.
#[derive(Debug, Clone, Default)]
pub struct SchoolHeader {
    pub name: String,
    pub address: String,
    pub cif: String,
}

impl SchoolHeader {
    pub(crate) fn render(&self, writer: &mut PdfWriter) {
        writer.centered(&self.name.to_uppercase(), 14);
        if !self.address.is_empty() {
            writer.centered(&self.address, 10);
        }
        if !self.cif.is_empty() {
            writer.centered(&format!("CIF {}", self.cif), 10);
        }
        writer.rule();
        writer.gap(10);
    }
}
