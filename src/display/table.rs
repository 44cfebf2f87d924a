use comfy_table::{Attribute, Cell, Color, Table, presets};
use crossterm::terminal;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::AppError;
use crate::models::{Customer, Group, Segment};

/// Formatter and utilities for table display
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Detect terminal width
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => {
                let width = cols as usize;
                // Clamp for stability on very narrow or very wide terminals
                Some(width.clamp(40, 200))
            }
            Err(_) => Some(80), // Default width
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Render a customer list in table format
    pub fn render_customer_list(&self, customers: &[Customer]) -> Result<String, AppError> {
        if customers.is_empty() {
            return Ok("No customers found.".to_string());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);

        table.set_header(self.header_cells(&["ID", "Name", "Email", "Phone", "Source"]));

        let name_width = self.name_column_width();
        for customer in customers {
            let name = customer.name().unwrap_or_else(|| "N/A".to_string());
            let email = customer.email_address.as_deref().unwrap_or("N/A");
            let phone = customer.phone_number.as_deref().unwrap_or("N/A");
            let source = customer
                .creation_source
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "N/A".to_string());

            let row = vec![
                self.id_cell(customer.id.as_deref().unwrap_or("N/A")),
                Cell::new(self.truncate_text(&name, name_width)),
                Cell::new(self.truncate_text(email, name_width)),
                Cell::new(phone),
                Cell::new(source),
            ];
            table.add_row(row);
        }

        Ok(table.to_string())
    }

    /// Render a single customer as a field/value table
    pub fn render_customer_details(&self, customer: &Customer) -> Result<String, AppError> {
        let mut table = Table::new();
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        table.set_header(self.header_cells(&["Field", "Value"]));

        let address = customer
            .address
            .as_ref()
            .and_then(|a| a.full_address())
            .unwrap_or_else(|| "N/A".to_string());
        let birthday = customer
            .birthday
            .as_ref()
            .map(|b| match b.year() {
                Some(year) => format!("{year}-{:02}-{:02}", b.month(), b.day()),
                None => format!("--{:02}-{:02}", b.month(), b.day()),
            })
            .unwrap_or_else(|| "N/A".to_string());

        let fields = vec![
            ("ID", customer.id.clone().unwrap_or_else(|| "N/A".to_string())),
            (
                "Name",
                customer.name().unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Company",
                customer
                    .company_name
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Email",
                customer
                    .email_address
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Phone",
                customer
                    .phone_number
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Address", address),
            ("Birthday", birthday),
            (
                "Reference ID",
                customer
                    .reference_id
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Source",
                customer
                    .creation_source
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Groups", join_or_none(&customer.group_ids)),
            ("Segments", join_or_none(&customer.segment_ids)),
            ("Cards", customer.cards.len().to_string()),
            (
                "Created At",
                customer
                    .created_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Updated At",
                customer
                    .updated_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
        ];

        for (field_name, field_value) in fields {
            let row = vec![
                if self.use_colors {
                    Cell::new(field_name).fg(Color::Yellow)
                } else {
                    Cell::new(field_name)
                },
                Cell::new(field_value),
            ];
            table.add_row(row);
        }

        Ok(table.to_string())
    }

    /// Render a group list in table format
    pub fn render_group_list(&self, groups: &[Group]) -> Result<String, AppError> {
        if groups.is_empty() {
            return Ok("No groups found.".to_string());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);
        table.set_header(self.header_cells(&["ID", "Name", "Created At", "Updated At"]));

        for group in groups {
            table.add_row(vec![
                self.id_cell(group.id.as_deref().unwrap_or("N/A")),
                Cell::new(group.name.as_deref().unwrap_or("N/A")),
                Cell::new(format_date(&group.created_at)),
                Cell::new(format_date(&group.updated_at)),
            ]);
        }

        Ok(table.to_string())
    }

    /// Render a segment list in table format
    pub fn render_segment_list(&self, segments: &[Segment]) -> Result<String, AppError> {
        if segments.is_empty() {
            return Ok("No segments found.".to_string());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);
        table.set_header(self.header_cells(&["ID", "Name", "Created At", "Updated At"]));

        for segment in segments {
            table.add_row(vec![
                self.id_cell(segment.id.as_deref().unwrap_or("N/A")),
                Cell::new(segment.name.as_deref().unwrap_or("N/A")),
                Cell::new(format_date(&segment.created_at)),
                Cell::new(format_date(&segment.updated_at)),
            ]);
        }

        Ok(table.to_string())
    }

    fn header_cells(&self, names: &[&str]) -> Vec<Cell> {
        names
            .iter()
            .map(|name| {
                if self.use_colors {
                    Cell::new(name).add_attribute(Attribute::Bold).fg(Color::Cyan)
                } else {
                    Cell::new(name).add_attribute(Attribute::Bold)
                }
            })
            .collect()
    }

    fn id_cell(&self, id: &str) -> Cell {
        if self.use_colors {
            Cell::new(id).fg(Color::Cyan)
        } else {
            Cell::new(id)
        }
    }

    /// Set table width to match the terminal size
    fn configure_table_width(&self, table: &mut Table) {
        if let Some(terminal_width) = self.max_width {
            // Leave room for borders and padding
            let available_width = if terminal_width > 20 {
                terminal_width - 6
            } else {
                terminal_width.max(40)
            };
            table.set_width(available_width as u16);
        } else {
            table.set_width(80);
        }
    }

    fn name_column_width(&self) -> usize {
        let terminal_width = self.max_width.unwrap_or(80);
        if terminal_width < 80 {
            15
        } else if terminal_width < 120 {
            25
        } else {
            40
        }
    }

    /// Truncate text to specified width and add ellipsis
    fn truncate_text(&self, text: &str, max_width: usize) -> String {
        if text.width() <= max_width {
            return text.to_string();
        }

        let ellipsis = "...";
        let ellipsis_width = ellipsis.width();

        if max_width <= ellipsis_width {
            return ellipsis[..max_width].to_string();
        }

        let target_width = max_width - ellipsis_width;
        let mut result = String::new();
        let mut current_width = 0;

        for ch in text.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > target_width {
                break;
            }
            result.push(ch);
            current_width += ch_width;
        }

        result.push_str(ellipsis);
        result
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

fn format_date(datetime: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    datetime
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn join_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "N/A".to_string()
    } else {
        ids.join(", ")
    }
}
