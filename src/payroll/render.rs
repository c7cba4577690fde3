//! Payslip document assembly.
//!
//! A payslip is first turned into a [`Document`], a flat list of layout
//! blocks, and then handed to a [`DocumentSink`] that produces the bytes.

use thiserror::Error;

use crate::model::{
    employee::Employee,
    payslip::{LineItem, Payslip},
};

use super::words::amount_in_words;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const FOOTER: &str = "-- This is a system generated payslip, hence the signature is not required. --";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("month {0} is outside 1-12")]
    InvalidMonth(u32),
    #[error("document backend failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BANNER: Rgb = Rgb(0x2c, 0x3e, 0x50);
    pub const TABLE_HEADER: Rgb = Rgb(0x34, 0x49, 0x5e);
    pub const TOTALS: Rgb = Rgb(0xec, 0xf0, 0xf1);
    pub const NET: Rgb = Rgb(0x27, 0xae, 0x60);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Black,
    White,
    Grey,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub tone: Tone,
}

impl TextStyle {
    pub const fn plain(size: f32) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            align: Align::Left,
            tone: Tone::Black,
        }
    }

    const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    const fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    const fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub bold: bool,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    pub fn empty() -> Self {
        Self::text("")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub cells: Vec<Cell>,
    pub fill: Option<Rgb>,
    pub tone: Tone,
}

impl GridRow {
    fn plain(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            fill: None,
            tone: Tone::Black,
        }
    }

    fn filled(cells: Vec<Cell>, fill: Rgb, tone: Tone) -> Self {
        Self {
            cells,
            fill: Some(fill),
            tone,
        }
    }
}

/// Bordered table. `widths` are fractions of the printable width.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub widths: Vec<f32>,
    pub rows: Vec<GridRow>,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph { text: String, style: TextStyle },
    Banner { text: String, fill: Rgb },
    Grid(Grid),
    /// Vertical gap in points.
    Spacer(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Turns structured blocks into a finished document.
pub trait DocumentSink: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError>;
}

/// Presentation settings that are not part of the payslip itself.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub org_name: String,
    pub org_address: Option<String>,
    /// Prefix for printed amounts, e.g. "Rs.". None prints bare numbers.
    pub currency_symbol: Option<String>,
}

pub struct RenderedPayslip {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Renderer plus the sink it prints through; shared as application data.
pub struct PayslipPrinter {
    options: RenderOptions,
    sink: Box<dyn DocumentSink>,
}

impl PayslipPrinter {
    pub fn new(options: RenderOptions, sink: Box<dyn DocumentSink>) -> Self {
        Self { options, sink }
    }

    pub fn print(
        &self,
        payslip: &Payslip,
        employee: &Employee,
    ) -> Result<RenderedPayslip, RenderError> {
        let document = render_payslip(payslip, employee, &self.options)?;
        let bytes = self.sink.render(&document)?;

        Ok(RenderedPayslip {
            file_name: file_name(payslip, self.sink.extension())?,
            content_type: self.sink.content_type(),
            bytes,
        })
    }
}

pub fn month_name(month: u32) -> Option<&'static str> {
    let index = month.checked_sub(1)? as usize;
    MONTH_NAMES.get(index).copied()
}

/// `payslip_<employeeNo>_<MonthName>_<year>.<ext>`
pub fn file_name(payslip: &Payslip, extension: &str) -> Result<String, RenderError> {
    let month = month_name(payslip.month).ok_or(RenderError::InvalidMonth(payslip.month))?;
    Ok(format!(
        "payslip_{}_{}_{}.{}",
        payslip.employee_no, month, payslip.year, extension
    ))
}

/// Two decimals with comma thousands grouping: `1234567.5` -> `1,234,567.50`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // no sign when the amount rounds to zero
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

pub fn render_payslip(
    payslip: &Payslip,
    employee: &Employee,
    options: &RenderOptions,
) -> Result<Document, RenderError> {
    let month = month_name(payslip.month).ok_or(RenderError::InvalidMonth(payslip.month))?;
    let money = |value: f64| match &options.currency_symbol {
        Some(symbol) => format!("{symbol} {}", format_amount(value)),
        None => format_amount(value),
    };

    let title = format!("Payslip for the month of {month} {}", payslip.year);
    let mut blocks = vec![Block::Paragraph {
        text: title.clone(),
        style: TextStyle::plain(14.0).bold().centered(),
    }];

    // ---------- organization header ----------
    if !options.org_name.is_empty() {
        blocks.push(Block::Paragraph {
            text: options.org_name.clone(),
            style: TextStyle::plain(12.0).bold().centered(),
        });
    }
    if let Some(address) = &options.org_address {
        blocks.push(Block::Paragraph {
            text: address.clone(),
            style: TextStyle::plain(9.0).centered().tone(Tone::Grey),
        });
    }
    blocks.push(Block::Spacer(6.0));
    blocks.push(Block::Banner {
        text: "EMPLOYEE PAY SUMMARY".to_string(),
        fill: Rgb::BANNER,
    });
    blocks.push(Block::Spacer(10.0));

    // ---------- identity ----------
    let pair = |label: &str, value: String| [Cell::bold(format!("{label}:")), Cell::text(value)];
    let identity_rows = [
        (
            pair("Employee Name", payslip.employee_name.clone()),
            pair("Employee No", payslip.employee_no.clone()),
        ),
        (
            pair("Designation", payslip.designation.clone()),
            pair("Department", employee.department.clone()),
        ),
        (
            pair(
                "Date of Joining",
                employee.date_of_joining.format("%Y-%m-%d").to_string(),
            ),
            pair("Bank Account No", employee.bank_account_no.clone()),
        ),
        (
            pair("Paid Days", payslip.paid_days.to_string()),
            pair("LOP Days", payslip.lop_days.to_string()),
        ),
        (
            pair("Work Location", employee.work_location.clone()),
            [Cell::empty(), Cell::empty()],
        ),
    ];
    blocks.push(Block::Grid(Grid {
        widths: vec![0.2, 0.3, 0.2, 0.3],
        rows: identity_rows
            .into_iter()
            .map(|(left, right)| GridRow::plain(left.into_iter().chain(right).collect()))
            .collect(),
        font_size: 9.0,
    }));
    blocks.push(Block::Spacer(15.0));

    // ---------- earnings / deductions ----------
    let side = |items: &[LineItem]| -> Vec<[Cell; 2]> {
        items
            .iter()
            .map(|i| [Cell::text(i.label.clone()), Cell::text(money(i.amount))])
            .collect()
    };
    let mut earnings = side(&payslip.earnings);
    let mut deductions = side(&payslip.deductions);
    let height = earnings.len().max(deductions.len());
    earnings.resize_with(height, || [Cell::empty(), Cell::empty()]);
    deductions.resize_with(height, || [Cell::empty(), Cell::empty()]);

    let mut salary_rows = vec![GridRow::filled(
        vec![
            Cell::bold("EARNINGS"),
            Cell::empty(),
            Cell::bold("DEDUCTIONS"),
            Cell::empty(),
        ],
        Rgb::TABLE_HEADER,
        Tone::White,
    )];
    salary_rows.extend(
        earnings
            .into_iter()
            .zip(deductions)
            .map(|(e, d)| GridRow::plain(e.into_iter().chain(d).collect())),
    );
    salary_rows.push(GridRow::filled(
        vec![
            Cell::bold("Gross Earnings"),
            Cell::bold(money(payslip.gross_earnings)),
            Cell::bold("Total Deductions"),
            Cell::bold(money(payslip.total_deductions)),
        ],
        Rgb::TOTALS,
        Tone::Black,
    ));
    blocks.push(Block::Grid(Grid {
        widths: vec![2.5 / 7.5, 1.25 / 7.5, 2.5 / 7.5, 1.25 / 7.5],
        rows: salary_rows,
        font_size: 9.0,
    }));
    blocks.push(Block::Spacer(15.0));

    // ---------- net payable ----------
    blocks.push(Block::Grid(Grid {
        widths: vec![5.5 / 7.5, 2.0 / 7.5],
        rows: vec![GridRow::filled(
            vec![
                Cell::bold("Total Net Payable"),
                Cell::bold(money(payslip.net_payable)),
            ],
            Rgb::NET,
            Tone::White,
        )],
        font_size: 10.0,
    }));
    blocks.push(Block::Paragraph {
        text: amount_in_words(payslip.net_payable),
        style: TextStyle::plain(8.0).italic(),
    });
    blocks.push(Block::Spacer(30.0));
    blocks.push(Block::Paragraph {
        text: FOOTER.to_string(),
        style: TextStyle::plain(8.0).centered().tone(Tone::Grey),
    });

    Ok(Document { title, blocks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::fixtures;
    use crate::model::payslip::PayslipRequest;
    use crate::payroll::calculator::issue_payslip;

    fn payslip(month: u32) -> (Payslip, Employee) {
        let employee = Employee::new(fixtures::new_employee("EMP-007"));
        let request = PayslipRequest {
            employee_id: employee.id.clone(),
            month,
            year: 2026,
            paid_days: 28,
            lop_days: 3,
            home_collection_visit: None,
            other_deduction: None,
        };
        (issue_payslip(&employee, &request), employee)
    }

    fn grids(document: &Document) -> Vec<&Grid> {
        document
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Grid(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    fn row_text(row: &GridRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn formats_amounts_with_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1000.0), "1,000.00");
        assert_eq!(format_amount(85_000.0), "85,000.00");
        assert_eq!(format_amount(1_234_567.5), "1,234,567.50");
        assert_eq!(format_amount(-1_500.0), "-1,500.00");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn month_names_are_one_indexed() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn file_name_convention() {
        let (payslip, _) = payslip(3);

        assert_eq!(
            file_name(&payslip, "pdf").unwrap(),
            "payslip_EMP-007_March_2026.pdf"
        );
    }

    #[test]
    fn title_and_footer() {
        let (payslip, employee) = payslip(1);

        let document = render_payslip(&payslip, &employee, &RenderOptions::default()).unwrap();

        assert_eq!(document.title, "Payslip for the month of January 2026");
        match document.blocks.last() {
            Some(Block::Paragraph { text, .. }) => assert!(text.contains("system generated")),
            other => panic!("unexpected last block {other:?}"),
        }
    }

    #[test]
    fn identity_block_lists_attendance() {
        let (payslip, employee) = payslip(1);

        let document = render_payslip(&payslip, &employee, &RenderOptions::default()).unwrap();
        let identity = grids(&document)[0];

        assert_eq!(identity.rows.len(), 5);
        assert_eq!(
            row_text(&identity.rows[3]),
            vec!["Paid Days:", "28", "LOP Days:", "3"]
        );
        assert_eq!(row_text(&identity.rows[4])[1], "Bengaluru");
    }

    #[test]
    fn salary_columns_are_padded_to_equal_height() {
        let (payslip, employee) = payslip(1);

        let document = render_payslip(&payslip, &employee, &RenderOptions::default()).unwrap();
        let salary = grids(&document)[1];

        // header + 4 earnings + totals
        assert_eq!(salary.rows.len(), 6);
        assert_eq!(
            row_text(&salary.rows[0]),
            vec!["EARNINGS", "", "DEDUCTIONS", ""]
        );
        assert_eq!(
            row_text(&salary.rows[1]),
            vec!["Basic", "50,000.00", "Professional Tax", "2,000.00"]
        );
        assert_eq!(
            row_text(&salary.rows[2]),
            vec!["House Rent Allowance", "20,000.00", "", ""]
        );
        let totals = salary.rows.last().unwrap();
        assert!(totals.cells.iter().all(|c| c.bold));
        assert_eq!(
            row_text(totals),
            vec!["Gross Earnings", "85,000.00", "Total Deductions", "2,000.00"]
        );
    }

    #[test]
    fn deductions_longer_than_earnings() {
        let (mut payslip, employee) = payslip(1);
        payslip.earnings = vec![LineItem::new("Basic", 100.0)];
        payslip.deductions = vec![LineItem::new("A", 1.0), LineItem::new("B", 2.0)];

        let document = render_payslip(&payslip, &employee, &RenderOptions::default()).unwrap();
        let salary = grids(&document)[1];

        assert_eq!(row_text(&salary.rows[2]), vec!["", "", "B", "2.00"]);
    }

    #[test]
    fn net_block_with_words_and_currency() {
        let (payslip, employee) = payslip(1);
        let options = RenderOptions {
            org_name: "Acme Diagnostics".to_string(),
            org_address: Some("12 MG Road, Bengaluru".to_string()),
            currency_symbol: Some("Rs.".to_string()),
        };

        let document = render_payslip(&payslip, &employee, &options).unwrap();
        let net = grids(&document)[2];

        assert_eq!(
            row_text(&net.rows[0]),
            vec!["Total Net Payable", "Rs. 83,000.00"]
        );
        assert!(document.blocks.contains(&Block::Paragraph {
            text: "Eighty Three Thousand Rupees Only".to_string(),
            style: TextStyle::plain(8.0).italic(),
        }));
        assert!(document.blocks.iter().any(|b| matches!(
            b,
            Block::Paragraph { text, .. } if text == "Acme Diagnostics"
        )));
    }

    #[test]
    fn invalid_month_is_rejected() {
        let (payslip, employee) = payslip(13);

        let err = render_payslip(&payslip, &employee, &RenderOptions::default()).unwrap_err();

        assert!(matches!(err, RenderError::InvalidMonth(13)));
    }
}
