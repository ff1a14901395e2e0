use crate::{TermInt, TermCoords};
use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

#[derive(Copy, Clone, Debug, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

/// Draws on the terminal and remembers what it drew, so overlays can be
/// lifted again and unchanged cells are not rewritten.
pub struct TermManager<W: Write = Stdout> {
    width: TermInt,
    height: TermInt,
    out: W,
    screen: Vec<Cell>,
    current_msg: Option<Message>,
    msg_center: TermCoords,
}

#[derive(Debug, PartialEq)]
struct Message {
    top_left: TermCoords,
    width: TermInt,
    height: TermInt,
}

impl TermManager<Stdout> {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::with_writer(stdout(), width, height))
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.out, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    pub fn read_key_events_queue(&self) -> io::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

impl<W: Write> TermManager<W> {
    pub fn with_writer(out: W, width: TermInt, height: TermInt) -> Self {
        let screen = vec![BLANK; width as usize * height as usize];
        let msg_center = (width / 2, height / 2);
        TermManager { width, height, out, screen, current_msg: None, msg_center }
    }

    /// Messages are centered here instead of on the whole terminal.
    pub fn set_message_center(&mut self, center: TermCoords) {
        self.msg_center = (center.0.min(self.width), center.1.min(self.height));
    }

    pub fn get_terminal_size(&self) -> TermCoords {
        (self.width, self.height)
    }

    pub fn draw_borders(&mut self, size: TermCoords) -> io::Result<()> {
        let (width, height) = size;
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch, Color::Reset)?;
            self.print_at((x, end_y), ch, Color::Reset)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|', Color::Reset)?;
            self.print_at((end_x, y), '|', Color::Reset)?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let msg_width = msg_width.min(self.width);
        let msg_height = msg_height.min(self.height);
        // Centered on msg_center, pushed back inside the screen if needed
        let center = self.msg_center;
        let top_left = (
            center.0.saturating_sub(msg_width / 2).min(self.width - msg_width),
            center.1.saturating_sub(msg_height / 2).min(self.height - msg_height),
        );

        // Blank top and bottom rows
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate().take(msg_height.saturating_sub(2) as usize) {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().take(msg_width as usize).enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> io::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the message covered
        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                let cell = self.screen[self.index((x, y))];
                self.write_cell((x, y), cell)?;
            }
        }

        self.flush()
    }

    /// Prints a colored character and records it. Skips the write when the
    /// cell already shows exactly that.
    pub fn print_at(&mut self, pos: TermCoords, ch: char, color: Color) -> io::Result<()> {
        let cell = Cell { ch, color };
        let idx = self.index(pos);
        if self.screen[idx] == cell {
            return Ok(());
        }

        self.screen[idx] = cell;
        self.write_cell(pos, cell)
    }

    pub fn print_str_at(&mut self, pos: TermCoords, s: &str, color: Color) -> io::Result<()> {
        for (i, ch) in s.chars().enumerate() {
            let x = pos.0 + i as TermInt;
            if x >= self.width {
                break;
            }
            self.print_at((x, pos.1), ch, color)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, style::ResetColor, terminal::Clear(ClearType::All))?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: TermCoords) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }

    fn write_cell(&mut self, pos: TermCoords, cell: Cell) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(pos.0, pos.1), style::SetForegroundColor(cell.color), style::Print(cell.ch))
    }

    fn print_at_no_save(&mut self, pos: TermCoords, ch: char) -> io::Result<()> {
        // Messages bypass the buffer so hiding them can restore what was under
        self.write_cell(pos, Cell { ch, color: Color::Reset })
    }
}
