//! Panel rendering for each data view

use crate::api::{ChartSlice, DashboardData, FileData, Project, RecentProject, TeamMember};
use crate::dashboard::{self, QualityTier};
use crate::ui::theme::{bar_gauge, Theme};
use crate::util::{format_date, time_ago, truncate, truncate_to_width};
use crate::viewer::{Highlight, RenderedLine};
use chrono::{DateTime, Utc};
use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct Panel;

fn block<'a>(title: String, focused: bool) -> Block<'a> {
    Block::default()
        .title(Span::styled(title, Theme::title()))
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::border_active()
        } else {
            Theme::border()
        })
        .style(Theme::panel_bg())
}

impl Panel {
    /// All projects, filtered by the search query
    pub fn projects<'a>(
        projects: &[&'a Project],
        total: usize,
        selected: usize,
        query: &'a str,
        loading: bool,
        error: Option<&'a str>,
    ) -> impl Widget + 'a {
        let mut items: Vec<ListItem> = Vec::new();

        if let Some(err) = error {
            items.push(ListItem::new(Line::from(Span::styled(
                format!(" {} {}", Theme::CROSS_MARK, err),
                Theme::error(),
            ))));
        } else if loading && projects.is_empty() {
            items.push(ListItem::new(Span::styled(" Loading projects…", Theme::text_dim())));
        } else if projects.is_empty() {
            let text = if query.is_empty() {
                " No projects yet. Press 3 to upload one."
            } else {
                " No projects match your search."
            };
            items.push(ListItem::new(Span::styled(text, Theme::text_dim())));
        }

        for (idx, project) in projects.iter().enumerate() {
            let is_selected = idx == selected;
            let base = if is_selected {
                Theme::selected()
            } else {
                Theme::text()
            };
            let marker = if is_selected { Theme::ARROW_RIGHT } else { ' ' };

            let members = if project.members.is_empty() {
                "no members".to_string()
            } else {
                project
                    .members
                    .iter()
                    .map(TeamMember::handle)
                    .collect::<Vec<_>>()
                    .join(" ")
            };

            items.push(ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!(" {} ", marker), base),
                    Span::styled(truncate_to_width(&project.title, 48), base),
                    Span::styled(
                        format!("  {} smells", project.total_smells),
                        Theme::text_muted(),
                    ),
                ]),
                Line::from(vec![
                    Span::raw("   "),
                    Span::styled(truncate(&project.description, 70), Theme::text_muted()),
                ]),
                Line::from(vec![
                    Span::raw("   "),
                    Span::styled(truncate(&members, 50), Theme::text_dim()),
                    Span::styled(format!(" {} ", Theme::DOT_SEPARATOR), Theme::text_dim()),
                    Span::styled(
                        format!("updated {}", format_date(&project.last_updated)),
                        Theme::text_dim(),
                    ),
                ]),
            ]));
        }

        let title = if query.is_empty() {
            format!(" projects ({}) ", total)
        } else {
            format!(" projects (filtered: {}) ", projects.len())
        };
        List::new(items).block(block(title, true))
    }

    /// Sidebar: navigation plus the recent-projects list
    #[allow(clippy::too_many_arguments)]
    pub fn sidebar<'a>(
        active_nav: usize,
        recent: &[&'a RecentProject],
        selected: Option<usize>,
        filter: &'a str,
        error: Option<&'a str>,
        focused: bool,
        now: DateTime<Utc>,
        width: u16,
    ) -> impl Widget + 'a {
        let mut lines: Vec<Line> = Vec::new();
        for (i, label) in ["Dashboard", "Projects", "Upload"].iter().enumerate() {
            let style = if i == active_nav {
                Theme::bold()
            } else {
                Theme::text_muted()
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", i + 1), Theme::key()),
                Span::styled(*label, style),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" RECENT", Theme::text_dim())));
        if !filter.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(" filter: {}", filter),
                Theme::text_muted(),
            )));
        }

        let inner = width.saturating_sub(6) as usize;
        if let Some(err) = error {
            lines.push(Line::from(Span::styled(format!(" {}", err), Theme::error())));
        } else if recent.is_empty() {
            lines.push(Line::from(Span::styled(" nothing here yet", Theme::text_dim())));
        }
        for (idx, project) in recent.iter().enumerate() {
            let is_selected = focused && selected == Some(idx);
            let style = if is_selected {
                Theme::selected()
            } else {
                Theme::text()
            };
            lines.push(Line::from(Span::styled(
                format!(" {}", truncate_to_width(&project.title, inner)),
                style,
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "   {} {} {}",
                    time_ago(&project.created_at, now),
                    Theme::DOT_SEPARATOR,
                    project.total_smells
                ),
                Theme::text_dim(),
            )));
        }

        Paragraph::new(lines).block(block(" navigate ".to_string(), focused))
    }

    /// One stat card on the dashboard
    pub fn stat_card<'a>(title: &'a str, value: String, caption: Line<'a>) -> impl Widget + 'a {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(format!(" {}", value), Theme::bold())),
            caption,
        ];
        Paragraph::new(lines).block(block(format!(" {} ", title), false))
    }

    pub fn quality_card<'a>(data: &DashboardData, width: u16) -> impl Widget + 'a {
        let tier = QualityTier::from_score(data.code_quality);
        let color = Theme::quality_color(tier);
        let gauge_width = width.saturating_sub(4) as usize;
        let percent = (dashboard::quality_ratio(data.code_quality) * 100.0).round() as u8;
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!(" {}%", dashboard::format_quality(data.code_quality)),
                    Theme::bold(),
                ),
                Span::styled(format!("  {}", tier.label()), Style::default().fg(color)),
            ]),
            Line::from(Span::styled(
                format!(" {}", bar_gauge(percent, gauge_width)),
                Style::default().fg(color),
            )),
        ];
        Paragraph::new(lines).block(block(" code quality ".to_string(), false))
    }

    /// Smell categories as a proportional bar plus legend
    pub fn smell_chart<'a>(chart_data: &[ChartSlice], width: u16) -> impl Widget + 'a {
        let slices = dashboard::chart_slices(chart_data);
        let percents = dashboard::slice_percentages(&slices);
        let widths = dashboard::slice_widths(&slices, width.saturating_sub(4));

        let bar: Vec<Span> = slices
            .iter()
            .zip(&widths)
            .map(|(s, &w)| {
                Span::styled(
                    Theme::BAR_FILLED.to_string().repeat(w as usize),
                    Style::default().fg(dashboard::parse_hex_color(&s.color)),
                )
            })
            .collect();

        let mut lines = vec![Line::from(""), Line::from(bar), Line::from("")];
        for (slice, pct) in slices.iter().zip(&percents) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} ", Theme::BULLET_FILLED),
                    Style::default().fg(dashboard::parse_hex_color(&slice.color)),
                ),
                Span::styled(format!("{:<20}", slice.category), Theme::text()),
                Span::styled(format!("{:>6}", slice.value), Theme::text_muted()),
                Span::styled(format!("  {:>5.1}%", pct), Theme::text_dim()),
            ]));
        }

        Paragraph::new(lines).block(block(" smells by category ".to_string(), false))
    }

    /// Files of a report with their smell counts
    pub fn file_explorer<'a>(
        files: &[(&'a FileData, usize)],
        selected: usize,
        focused: bool,
    ) -> impl Widget + 'a {
        let items: Vec<ListItem> = if files.is_empty() {
            vec![ListItem::new(Span::styled(" no files", Theme::text_dim()))]
        } else {
            files
                .iter()
                .enumerate()
                .map(|(idx, (file, count))| {
                    let style = if idx == selected {
                        Theme::selected()
                    } else if *count > 0 {
                        Theme::text()
                    } else {
                        Theme::text_muted()
                    };
                    let count_style = if *count > 0 {
                        Theme::error()
                    } else {
                        Theme::text_dim()
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(format!(" {}", truncate(&file.file_name, 26)), style),
                        Span::styled(format!(" {}", count), count_style),
                    ]))
                })
                .collect()
        };
        List::new(items).block(block(format!(" files ({}) ", files.len()), focused))
    }

    /// Source text with smell badges and severity highlighting
    pub fn code_view<'a>(
        title: String,
        lines: &[RenderedLine<'a>],
        scroll: u16,
        focused: bool,
    ) -> impl Widget + 'a {
        let gutter = lines.last().map(|l| l.number.to_string().len()).unwrap_or(1);
        let mut rows: Vec<Line> = Vec::with_capacity(lines.len());

        if lines.is_empty() {
            rows.push(Line::from(Span::styled(" Select a file", Theme::text_dim())));
        }

        for line in lines {
            if let Some(badge) = line.badge {
                rows.push(Line::from(vec![
                    Span::raw(" ".repeat(gutter + 3)),
                    Span::styled(
                        format!(
                            " {} {} L{}-{} ",
                            badge.smell.smell_type,
                            Theme::DOT_SEPARATOR,
                            badge.smell.start_line,
                            badge.smell.end_line
                        ),
                        Theme::severity_badge(badge.severity),
                    ),
                    Span::styled(
                        format!(" {} · weight {}", badge.severity.label(), badge.severity.weight()),
                        Theme::text_dim(),
                    ),
                ]));
            }

            let marker = line_marker(line.highlight.as_ref());
            let text_style = match line.highlight {
                Some(h) => Theme::severity_line(h.severity),
                None => Theme::text(),
            };
            let marker_style = match line.highlight {
                Some(h) => Style::default().fg(Theme::severity_color(h.severity)),
                None => Theme::text_dim(),
            };
            rows.push(Line::from(vec![
                Span::styled(format!("{:>width$} ", line.number, width = gutter), Theme::text_dim()),
                Span::styled(marker, marker_style),
                Span::styled(line.display_text().replace('\t', "    "), text_style),
            ]));
        }

        Paragraph::new(rows)
            .scroll((scroll, 0))
            .block(block(title, focused))
    }

    /// Text input with a label and optional error underneath
    pub fn input_lines<'a>(
        label: &'a str,
        value: &str,
        focused: bool,
        masked: bool,
        error: Option<&'a str>,
    ) -> Vec<Line<'a>> {
        let shown = if masked {
            "•".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let cursor = if focused { "▏" } else { "" };
        let mut lines = vec![
            Line::from(Span::styled(format!(" {}", label), Theme::text_muted())),
            Line::from(vec![
                Span::styled(if focused { " ▸ " } else { "   " }, Theme::key()),
                Span::styled(format!("{}{}", shown, cursor), Theme::input(focused)),
            ]),
        ];
        if let Some(err) = error {
            lines.push(Line::from(Span::styled(format!("   {}", err), Theme::error())));
        }
        lines
    }

    /// Wrapping paragraph inside a titled block
    pub fn form<'a>(title: String, lines: Vec<Line<'a>>) -> impl Widget + 'a {
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block(title, true))
    }
}

/// Two-column gutter marker. `+N` counts the smells hidden under the line's
/// owner, capped at 9.
fn line_marker(highlight: Option<&Highlight>) -> String {
    match highlight {
        Some(h) if h.is_start && h.covering > 1 => format!("+{}", (h.covering - 1).min(9)),
        Some(h) if h.is_start => "▶ ".to_string(),
        Some(_) => "│ ".to_string(),
        None => "  ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Smell;
    use crate::viewer::render_lines;
    use ratatui::{buffer::Buffer, layout::Rect};

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_code_view_draws_badge_above_anchor() {
        let smell = Smell {
            smell_type: "Long Method".into(),
            file_name: "A.java".into(),
            file_path: String::new(),
            start_line: 2,
            end_line: 40,
            category: "design".into(),
            weight: 4.0,
            id: None,
        };
        let content = "class A {\n  void run() {\n  }\n}";
        let lines = render_lines(content, &[&smell]);

        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);
        Panel::code_view(" A.java ".into(), &lines, 0, true).render(area, &mut buf);
        let text = buffer_text(&buf);
        let rows: Vec<&str> = text.lines().collect();

        assert!(rows[2].contains("Long Method"));
        assert!(rows[3].contains("void run()"));
    }

    #[test]
    fn test_overlap_marker_stays_two_columns() {
        let smells: Vec<Smell> = (0..12)
            .map(|i| Smell {
                smell_type: format!("Magic Number {}", i),
                file_name: "A.java".into(),
                file_path: String::new(),
                start_line: 1,
                end_line: 1,
                category: "implementation".into(),
                weight: 1.0,
                id: None,
            })
            .collect();
        let refs: Vec<&Smell> = smells.iter().collect();
        let lines = render_lines("x = 42\ny = 7", &refs);

        let crowded = line_marker(lines[0].highlight.as_ref());
        assert_eq!(crowded, "+9");
        assert_eq!(line_marker(lines[1].highlight.as_ref()), "  ");

        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        Panel::code_view(" A.java ".into(), &lines, 0, true).render(area, &mut buf);
        let text = buffer_text(&buf);
        let rows: Vec<&str> = text.lines().collect();
        let x_col = rows[2].find("x = 42").unwrap();
        let y_col = rows[3].find("y = 7").unwrap();
        assert_eq!(x_col, y_col);
    }

    #[test]
    fn test_empty_project_list_hint() {
        let area = Rect::new(0, 0, 60, 5);
        let mut buf = Buffer::empty(area);
        Panel::projects(&[], 0, 0, "", false, None).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("No projects yet"));
    }
}
