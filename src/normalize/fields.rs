//! The column alias table. Each logical field lists the sheet labels it may appear under, in the
//! order they are tried. Labels are matched in canonical form, so `TIPO_COMP` and `tipo comp `
//! both match `TIPO COMP`.
//!
//! The first alias of each field is also the label used when entries or book records are exported,
//! which lets an exported file be imported again.

// Ledger (`Hoja1`)
pub const VOUCHER_TYPE: &[&str] = &["TIPO COMP", "TIPO COMPROBANTE"];
pub const VOUCHER_NUMBER: &[&str] = &["N. COMP", "N COMP", "NRO COMP", "N° COMP"];
pub const ENTRY_DATE: &[&str] = &["FECHA", "FECHA COMP"];
pub const GLOSS: &[&str] = &["GLOSA", "DESCRIPCION"];
pub const ACCOUNT_CODE: &[&str] = &["CODIGO", "CÓDIGO", "CUENTA"];
pub const ACCOUNT_NAME: &[&str] = &["CTA DESCRIPCION", "CTA DESCRIPCIÓN", "NOMBRE CUENTA"];
pub const DEBIT: &[&str] = &["DEBE"];
pub const CREDIT: &[&str] = &["HABER"];
pub const CONTROL: &[&str] = &["CONTROL"];
pub const COMPENSATION: &[&str] = &["COMPENSACION", "COMPENSACIÓN"];
pub const DOCUMENT_TYPE: &[&str] = &["TIPO DOC", "TIPO DOCUMENTO"];
pub const DOCUMENT_NUMBER: &[&str] = &["N. DOC", "N DOC", "NRO DOC", "N° DOC"];
pub const THIRD_PARTY_TAX_ID: &[&str] = &["RUT"];
pub const THIRD_PARTY_NAME: &[&str] = &["NOMBRE", "RAZON SOCIAL"];

// Purchase book (`Libro compra `) and sales book (`Libro Ventas`)
pub const MONTH: &[&str] = &["Mes"];
pub const BOOK_LINE: &[&str] = &["Nro", "N°", "Numero"];
pub const BOOK_DOCUMENT_TYPE: &[&str] = &["Tipo Doc", "Tipo Documento"];
pub const PURCHASE_TYPE: &[&str] = &["Tipo Compra"];
pub const SALE_TYPE: &[&str] = &["Tipo Venta"];
pub const SUPPLIER_TAX_ID: &[&str] = &["RUT Proveedor", "RUT"];
pub const CUSTOMER_TAX_ID: &[&str] = &["Rut cliente", "RUT"];
pub const COUNTERPARTY_NAME: &[&str] = &["Razon Social", "Razón Social", "Nombre"];
pub const FOLIO: &[&str] = &["Folio"];
pub const DOCUMENT_DATE: &[&str] = &["Fecha Docto", "Fecha Documento", "Fecha"];
pub const RECEPTION_DATE: &[&str] = &["Fecha Recepcion", "Fecha Recepción"];
pub const ACKNOWLEDGMENT_DATE: &[&str] = &["Fecha Acuse"];
pub const EXEMPT_AMOUNT: &[&str] = &["Monto Exento"];
pub const NET_AMOUNT: &[&str] = &["Monto Neto"];
pub const RECOVERABLE_VAT: &[&str] = &["Monto IVA Recuperable", "Monto IVA"];
pub const SALES_VAT: &[&str] = &["Monto IVA"];
pub const FIXED_ASSET_AMOUNT: &[&str] = &["Monto Neto Activo Fijo"];
pub const NON_RECOVERABLE_VAT: &[&str] = &["Monto Iva No Recuperable"];
pub const TOTAL_AMOUNT: &[&str] = &["Monto Total"];

/// Ledger columns in export order, each under its primary label.
pub const LEDGER_COLUMNS: &[&[&str]] = &[
    VOUCHER_TYPE,
    VOUCHER_NUMBER,
    ENTRY_DATE,
    GLOSS,
    ACCOUNT_CODE,
    ACCOUNT_NAME,
    DEBIT,
    CREDIT,
    CONTROL,
    COMPENSATION,
    DOCUMENT_TYPE,
    DOCUMENT_NUMBER,
    THIRD_PARTY_TAX_ID,
    THIRD_PARTY_NAME,
];


/// Purchase book columns in export order.
pub const PURCHASE_COLUMNS: &[&[&str]] = &[
    MONTH,
    BOOK_LINE,
    BOOK_DOCUMENT_TYPE,
    PURCHASE_TYPE,
    SUPPLIER_TAX_ID,
    COUNTERPARTY_NAME,
    FOLIO,
    DOCUMENT_DATE,
    RECEPTION_DATE,
    ACKNOWLEDGMENT_DATE,
    EXEMPT_AMOUNT,
    NET_AMOUNT,
    RECOVERABLE_VAT,
    FIXED_ASSET_AMOUNT,
    NON_RECOVERABLE_VAT,
    TOTAL_AMOUNT,
];

/// Sales book columns in export order.
pub const SALE_COLUMNS: &[&[&str]] = &[
    MONTH,
    BOOK_LINE,
    BOOK_DOCUMENT_TYPE,
    SALE_TYPE,
    CUSTOMER_TAX_ID,
    COUNTERPARTY_NAME,
    FOLIO,
    DOCUMENT_DATE,
    EXEMPT_AMOUNT,
    NET_AMOUNT,
    SALES_VAT,
    TOTAL_AMOUNT,
];

/// The primary label of each ledger column, in export order.
pub fn ledger_headers() -> Vec<&'static str> {
    primary_labels(LEDGER_COLUMNS)
}

pub fn purchase_headers() -> Vec<&'static str> {
    primary_labels(PURCHASE_COLUMNS)
}

pub fn sale_headers() -> Vec<&'static str> {
    primary_labels(SALE_COLUMNS)
}

fn primary_labels(columns: &[&[&'static str]]) -> Vec<&'static str> {
    columns.iter().map(|aliases| aliases[0]).collect()
}
