//! Rendering of interface tables and notifications for the printer.
//!
//! Two formats are supported:
//! - **Text**: one space-separated line per item (`IFACE eth0 aa:bb:cc:dd:ee:ff Ethernet`)
//! - **JSON**: one object per line, tagged with an `"event"` field

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::monitor::{InterfaceEvent, InterfaceTable};
use crate::network::InterfaceRecord;

/// Output format of the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// JSON lines.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum JsonLine<'a> {
    Iface(&'a InterfaceRecord),
    New(&'a InterfaceRecord),
    Gone(&'a InterfaceRecord),
    Status { name: &'a str, active: bool },
}

/// Writes tables and notifications to an output sink.
///
/// # Example
///
/// ```
/// use ifwatch::monitor::InterfaceEvent;
/// use ifwatch::network::{HardwareAddress, InterfaceKind, InterfaceRecord};
/// use ifwatch::output::{OutputFormat, Printer};
///
/// let mut printer = Printer::new(Vec::new(), OutputFormat::Text);
/// let record = InterfaceRecord::new(
///     "eth0",
///     InterfaceKind::Ethernet,
///     HardwareAddress::from([0x02, 0, 0, 0, 0, 0x01]),
///     true,
/// );
/// printer.print_event(&InterfaceEvent::Added(record)).unwrap();
///
/// let out = String::from_utf8(printer.into_inner()).unwrap();
/// assert_eq!(out, "NEW eth0 02:00:00:00:00:01 Ethernet\n");
/// ```
#[derive(Debug)]
pub struct Printer<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Printer<W> {
    /// Creates a printer writing to `out` in the given format.
    #[must_use]
    pub const fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Returns the output format.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Prints every interface in the table, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn print_table(&mut self, table: &InterfaceTable) -> io::Result<()> {
        for record in table {
            match self.format {
                OutputFormat::Text => self.write_record("IFACE", record)?,
                OutputFormat::Json => self.write_json(&JsonLine::Iface(record))?,
            }
        }
        self.out.flush()
    }

    /// Prints one notification.
    ///
    /// [`InterfaceEvent::UpdateFailed`] produces no output; failures are
    /// reported through logging.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn print_event(&mut self, event: &InterfaceEvent) -> io::Result<()> {
        match (self.format, event) {
            (_, InterfaceEvent::UpdateFailed) => return Ok(()),
            (OutputFormat::Text, InterfaceEvent::Added(record)) => {
                self.write_record("NEW", record)?;
            }
            (OutputFormat::Text, InterfaceEvent::Removed(record)) => {
                writeln!(self.out, "GONE {}", record.name)?;
            }
            (OutputFormat::Text, InterfaceEvent::StatusChanged { name, active }) => {
                let state = if *active { "up" } else { "down" };
                writeln!(self.out, "STATUS {name} {state}")?;
            }
            (OutputFormat::Json, InterfaceEvent::Added(record)) => {
                self.write_json(&JsonLine::New(record))?;
            }
            (OutputFormat::Json, InterfaceEvent::Removed(record)) => {
                self.write_json(&JsonLine::Gone(record))?;
            }
            (OutputFormat::Json, InterfaceEvent::StatusChanged { name, active }) => {
                self.write_json(&JsonLine::Status {
                    name,
                    active: *active,
                })?;
            }
        }
        self.out.flush()
    }

    /// Consumes the printer, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record(&mut self, tag: &str, record: &InterfaceRecord) -> io::Result<()> {
        let address = if record.hardware_address.is_empty() {
            "-".to_string()
        } else {
            record.hardware_address.to_string()
        };
        writeln!(self.out, "{tag} {} {address} {}", record.name, record.kind)
    }

    fn write_json(&mut self, line: &JsonLine<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        writeln!(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{HardwareAddress, InterfaceKind};

    fn eth0() -> InterfaceRecord {
        InterfaceRecord::new(
            "eth0",
            InterfaceKind::Ethernet,
            HardwareAddress::from([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            true,
        )
    }

    fn lo() -> InterfaceRecord {
        InterfaceRecord::new("lo", InterfaceKind::Loopback, HardwareAddress::empty(), true)
    }

    fn render(format: OutputFormat, print: impl FnOnce(&mut Printer<Vec<u8>>)) -> String {
        let mut printer = Printer::new(Vec::new(), format);
        print(&mut printer);
        String::from_utf8(printer.into_inner()).unwrap()
    }

    fn json_lines(output: &str) -> Vec<serde_json::Value> {
        output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    mod text {
        use super::*;

        #[test]
        fn table_lines_sorted_by_name() {
            let table: InterfaceTable = [lo(), eth0()].into_iter().collect();

            let out = render(OutputFormat::Text, |p| p.print_table(&table).unwrap());

            assert_eq!(
                out,
                "IFACE eth0 aa:bb:cc:dd:ee:ff Ethernet\nIFACE lo - Loopback\n"
            );
        }

        #[test]
        fn empty_table_prints_nothing() {
            let out = render(OutputFormat::Text, |p| {
                p.print_table(&InterfaceTable::new()).unwrap();
            });

            assert!(out.is_empty());
        }

        #[test]
        fn events() {
            let out = render(OutputFormat::Text, |p| {
                p.print_event(&InterfaceEvent::Added(lo())).unwrap();
                p.print_event(&InterfaceEvent::Removed(eth0())).unwrap();
                p.print_event(&InterfaceEvent::status_changed("eth1", false))
                    .unwrap();
                p.print_event(&InterfaceEvent::status_changed("eth1", true))
                    .unwrap();
            });

            assert_eq!(
                out,
                "NEW lo - Loopback\nGONE eth0\nSTATUS eth1 down\nSTATUS eth1 up\n"
            );
        }

        #[test]
        fn update_failure_is_silent() {
            let out = render(OutputFormat::Text, |p| {
                p.print_event(&InterfaceEvent::UpdateFailed).unwrap();
            });

            assert!(out.is_empty());
        }
    }

    mod json {
        use super::*;

        #[test]
        fn table_rows_carry_record_fields() {
            let table: InterfaceTable = [eth0()].into_iter().collect();

            let out = render(OutputFormat::Json, |p| p.print_table(&table).unwrap());
            let lines = json_lines(&out);

            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0]["event"], "iface");
            assert_eq!(lines[0]["name"], "eth0");
            assert_eq!(lines[0]["hardware_address"], "aa:bb:cc:dd:ee:ff");
            assert_eq!(lines[0]["type"], "Ethernet");
            assert_eq!(lines[0]["is_active"], true);
            assert_eq!(lines[0]["is_virtual"], false);
        }

        #[test]
        fn events_are_tagged() {
            let out = render(OutputFormat::Json, |p| {
                p.print_event(&InterfaceEvent::Added(eth0())).unwrap();
                p.print_event(&InterfaceEvent::Removed(lo())).unwrap();
                p.print_event(&InterfaceEvent::status_changed("eth0", false))
                    .unwrap();
                p.print_event(&InterfaceEvent::UpdateFailed).unwrap();
            });
            let lines = json_lines(&out);

            assert_eq!(lines.len(), 3);
            assert_eq!(lines[0]["event"], "new");
            assert_eq!(lines[1]["event"], "gone");
            assert_eq!(lines[1]["hardware_address"], "");
            assert_eq!(
                lines[2],
                serde_json::json!({"event": "status", "name": "eth0", "active": false})
            );
        }
    }

    #[test]
    fn format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
