use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Clear, Gauge, List, ListItem, Paragraph, Row, Table,
        TableState, Wrap,
    },
};

use crate::data::EntityKind;
use crate::domain::{CmdMode, PAGES, Page};
use crate::engine::{self, SortDirection};
use crate::model::{Model, Status, TableContext};
use crate::pages::{self, StatCard};
use crate::record::Record;

pub const SIDEBAR_WIDTH: u16 = 16;
pub const CMDLINE_HEIGHT: u16 = 1;
pub const CARD_ROW_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 2;

const ACCENT: Color = Color::Green;
const DIM: Color = Color::DarkGray;

pub struct DashboardUI;

impl DashboardUI {
    pub fn new() -> Self {
        DashboardUI
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(frame.area());
        let [content, statusline] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(CMDLINE_HEIGHT)]).areas(main);

        self.draw_sidebar(model, frame, sidebar);

        if let Some(record) = model.record_detail() {
            self.draw_record_detail(record, frame, content);
        } else {
            match model.page() {
                Page::Dashboard => self.draw_dashboard(model, frame, content),
                Page::Recruiters | Page::Clients | Page::Candidates => {
                    self.draw_table_page(model, frame, content)
                }
                Page::Performance => self.draw_performance(model, frame, content),
                Page::Analytics => self.draw_analytics(frame, content),
                Page::Schedule => self.draw_schedule(frame, content),
                Page::Reports => self.draw_reports(frame, content),
                Page::Targets => self.draw_targets(frame, content),
            }
        }

        self.draw_statusline(model, frame, statusline);

        if model.show_popup() {
            self.draw_popup(model, frame);
        }
    }

    fn draw_sidebar(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = PAGES
            .iter()
            .enumerate()
            .map(|(idx, page)| {
                let line = Line::from(vec![
                    Span::styled(format!(" {} ", idx + 1), Style::default().fg(DIM)),
                    Span::raw(page.label()),
                ]);
                if *page == model.page() {
                    ListItem::new(line.style(Style::default().fg(ACCENT).bold()))
                } else {
                    ListItem::new(line)
                }
            })
            .collect();
        let list = List::new(items).block(Block::bordered().title(" staffdeck ".bold()));
        frame.render_widget(list, area);
    }

    fn draw_statusline(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let line = match model.cmdline() {
            Some((mode, input)) => {
                let prompt = match mode {
                    CmdMode::Search => "search: ",
                    CmdMode::Filter => "filter: ",
                };
                Line::from(vec![
                    Span::styled(prompt, Style::default().fg(ACCENT).bold()),
                    Span::raw(input.input.clone()),
                    Span::styled("█", Style::default().fg(ACCENT)),
                ])
            }
            None => {
                let loading = if model.status == Status::Loading {
                    " [loading]"
                } else {
                    ""
                };
                Line::from(vec![
                    Span::raw(format!(" {}{}", model.status_message(), loading)),
                    Span::styled("  |  ? for help", Style::default().fg(DIM)),
                ])
            }
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    // --------------------------- Table pages ----------------------------- //

    fn draw_table_page(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let Some(ctx) = model.table_context() else {
            return;
        };
        let [header, cards, composer, table, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(CARD_ROW_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(area);

        self.draw_page_header(frame, header, ctx.spec.title, ctx.spec.subtitle);
        self.draw_cards(frame, cards, &pages::summary_cards(model.page(), &ctx.records));
        self.draw_composer_line(model, frame, composer, &ctx);
        self.draw_data_table(model, frame, table, &ctx);
        self.draw_footer(model, frame, footer, &ctx);
    }

    fn draw_page_header(&self, frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
        let text = vec![
            Line::from(title.bold()),
            Line::from(Span::styled(subtitle, Style::default().fg(DIM))),
        ];
        frame.render_widget(Paragraph::new(text), area);
    }

    fn draw_cards(&self, frame: &mut Frame, area: Rect, cards: &[StatCard]) {
        if cards.is_empty() {
            return;
        }
        let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
        let slots = Layout::horizontal(constraints).split(area);
        for (card, slot) in cards.iter().zip(slots.iter()) {
            let text = Line::from(vec![
                Span::styled(card.label, Style::default().fg(DIM)),
                Span::raw("  "),
                Span::styled(card.value.clone(), Style::default().fg(ACCENT).bold()),
            ]);
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .block(Block::bordered()),
                *slot,
            );
        }
    }

    fn draw_composer_line(
        &self,
        model: &Model,
        frame: &mut Frame,
        area: Rect,
        ctx: &TableContext,
    ) {
        let composer = &model.page_view().composer;
        let mut spans = Vec::new();
        if !composer.search_text.is_empty() {
            spans.push(Span::styled("search:", Style::default().fg(DIM)));
            spans.push(Span::styled(
                format!("{} ", composer.search_text),
                Style::default().fg(ACCENT),
            ));
        }
        for (key, value) in composer.filters() {
            spans.push(Span::styled(
                format!("[{key}: {value}] "),
                Style::default().fg(ACCENT),
            ));
        }
        for (key, selection) in ctx.spec.prefilters.iter().zip(&model.page_view().prefilters) {
            let shown = selection.as_deref().unwrap_or("all");
            spans.push(Span::styled(
                format!("{key}={shown} "),
                Style::default().fg(DIM),
            ));
        }
        let count = composer.active_filter_count();
        if count > 0 {
            spans.push(Span::styled(
                format!("({count} active)"),
                Style::default().fg(DIM),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_data_table(&self, model: &Model, frame: &mut Frame, area: Rect, ctx: &TableContext) {
        if ctx.view.rows.is_empty() {
            let kind = ctx.spec.kind;
            let message = self.empty_table_message(model, kind);
            frame.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .block(Block::bordered()),
                area,
            );
            return;
        }

        let (_, cursor_col) = model.cursor();
        let sort = &model.page_view().table.sort;

        let header_cells: Vec<Span> = ctx
            .spec
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let marker = match sort {
                    Some(spec) if spec.key == column.key => match spec.direction {
                        SortDirection::Ascending => " ▲",
                        SortDirection::Descending => " ▼",
                    },
                    _ => "",
                };
                let mut style = Style::default().bold();
                if idx == cursor_col {
                    style = style.fg(ACCENT).add_modifier(Modifier::UNDERLINED);
                }
                Span::styled(format!("{}{marker}", column.label), style)
            })
            .collect();
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = ctx
            .view
            .rows
            .iter()
            .map(|&idx| {
                let record = &ctx.records[idx];
                Row::new(
                    ctx.spec
                        .columns
                        .iter()
                        .map(|column| column.cell(record))
                        .collect::<Vec<String>>(),
                )
            })
            .collect();

        let widths = self.column_widths(ctx);
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::bordered())
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .column_spacing(1);

        let (cursor_row, _) = model.cursor();
        let mut state = TableState::default().with_selected(Some(cursor_row));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn empty_table_message(&self, model: &Model, kind: EntityKind) -> &'static str {
        if model.status == Status::Loading && !model.has_loaded(kind) {
            "Loading ..."
        } else {
            "No data found"
        }
    }

    fn column_widths(&self, ctx: &TableContext) -> Vec<Constraint> {
        ctx.spec
            .columns
            .iter()
            .map(|column| {
                let cells = ctx
                    .view
                    .rows
                    .iter()
                    .map(|&idx| column.cell(&ctx.records[idx]).chars().count())
                    .max()
                    .unwrap_or(0);
                let width = std::cmp::max(column.label.chars().count() + 2, cells);
                Constraint::Length(std::cmp::min(width, 26) as u16)
            })
            .collect()
    }

    fn draw_footer(&self, model: &Model, frame: &mut Frame, area: Rect, ctx: &TableContext) {
        let view = &ctx.view;
        let mut summary = format!(
            "Showing {} to {} of {} entries",
            view.start_item, view.end_item, view.total_matched
        );
        if view.total_matched != view.total_records {
            summary.push_str(&format!(
                " (filtered from {} total entries)",
                view.total_records
            ));
        }

        let mut buttons = vec![Span::styled("[«][‹] ", Style::default().fg(DIM))];
        for page in engine::page_window(view.current_page, view.total_pages) {
            if page == view.current_page {
                buttons.push(Span::styled(
                    format!("[{page}] "),
                    Style::default().fg(ACCENT).bold(),
                ));
            } else {
                buttons.push(Span::raw(format!(" {page}  ")));
            }
        }
        buttons.push(Span::styled("[›][»]", Style::default().fg(DIM)));
        buttons.push(Span::styled(
            format!(
                "   Show {} entries (z to change)",
                model.page_view().table.pagination.items_per_page
            ),
            Style::default().fg(DIM),
        ));

        let lines = vec![
            Line::from(Span::styled(summary, Style::default().fg(DIM))),
            Line::from(buttons),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    // ------------------------- Dashboard page ----------------------------- //

    fn draw_dashboard(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let [header, cards, chart, bottom] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(CARD_ROW_HEIGHT),
            Constraint::Min(8),
            Constraint::Length(8),
        ])
        .areas(area);

        self.draw_page_header(
            frame,
            header,
            "Dashboard",
            "Recruitment overview across the agency",
        );
        let performance = model.records(EntityKind::Performance);
        self.draw_cards(
            frame,
            cards,
            &pages::summary_cards(Page::Dashboard, performance),
        );
        self.draw_hired_vs_target(frame, chart, performance);

        let [activity, performers, pipeline] = Layout::horizontal([
            Constraint::Ratio(2, 5),
            Constraint::Ratio(2, 5),
            Constraint::Ratio(1, 5),
        ])
        .areas(bottom);
        self.draw_activity(frame, activity);
        self.draw_top_performers(frame, performers);
        self.draw_pipeline(frame, pipeline);
    }

    fn draw_pipeline(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = pages::pipeline_breakdown()
            .into_iter()
            .map(|slice| {
                let bar = "█".repeat((slice.value / 5) as usize);
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<11}", slice.name)),
                    Span::styled(bar, Style::default().fg(ACCENT)),
                    Span::styled(format!(" {}%", slice.value), Style::default().fg(DIM)),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(items).block(Block::bordered().title(" Pipeline ")),
            area,
        );
    }

    fn draw_hired_vs_target(&self, frame: &mut Frame, area: Rect, performance: &[Record]) {
        let mut chart = BarChart::default()
            .block(Block::bordered().title(" Hired vs Target "))
            .bar_width(4)
            .bar_gap(1)
            .group_gap(2);
        for record in performance {
            let month = record
                .get("month")
                .map(|v| v.display())
                .unwrap_or_default();
            let hired = record.get("hired").and_then(|v| v.as_num()).unwrap_or(0.0);
            let target = record.get("target").and_then(|v| v.as_num()).unwrap_or(0.0);
            chart = chart.data(
                BarGroup::default().label(Line::from(month)).bars(&[
                    Bar::default()
                        .value(hired as u64)
                        .style(Style::default().fg(ACCENT)),
                    Bar::default()
                        .value(target as u64)
                        .style(Style::default().fg(DIM)),
                ]),
            );
        }
        frame.render_widget(chart, area);
    }

    fn draw_activity(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = pages::recent_activity()
            .into_iter()
            .map(|a| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<14}", a.recruiter), Style::default().fg(ACCENT)),
                    Span::raw(format!("{} @ {} ", a.action, a.client)),
                    Span::styled(a.time, Style::default().fg(DIM)),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(items).block(Block::bordered().title(" Recent Activity ")),
            area,
        );
    }

    fn draw_top_performers(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = pages::top_performers()
            .into_iter()
            .map(|p| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<18}", p.name), Style::default().bold()),
                    Span::raw(format!(
                        "{} hired  ₹{:.1}L  ",
                        p.hired,
                        p.revenue as f64 / 100000.0
                    )),
                    Span::styled(p.location, Style::default().fg(DIM)),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(items).block(Block::bordered().title(" Top Performers ")),
            area,
        );
    }

    // ------------------------ Performance page ---------------------------- //

    fn draw_performance(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let Some(ctx) = model.table_context() else {
            return;
        };
        let [header, cards, middle, table, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(CARD_ROW_HEIGHT),
            Constraint::Length(9),
            Constraint::Min(3),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(area);

        self.draw_page_header(frame, header, ctx.spec.title, ctx.spec.subtitle);
        self.draw_cards(frame, cards, &pages::summary_cards(model.page(), &ctx.records));

        let [chart, dept, region] = Layout::horizontal([
            Constraint::Ratio(2, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .areas(middle);
        self.draw_hired_vs_target(frame, chart, &ctx.records);
        self.draw_department_performance(frame, dept);
        self.draw_region_performance(frame, region);

        self.draw_data_table(model, frame, table, &ctx);
        self.draw_footer(model, frame, footer, &ctx);
    }

    fn draw_department_performance(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = pages::department_performance()
            .into_iter()
            .map(|d| {
                Row::new(vec![
                    d.department.to_string(),
                    format!("{}/{}", d.hired, d.target),
                    format!("{}%", d.achievement),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(12),
                Constraint::Length(7),
                Constraint::Length(5),
            ],
        )
        .header(Row::new(vec!["Department", "Hired", "Ach."]).bold())
        .block(Block::bordered().title(" Departments "));
        frame.render_widget(table, area);
    }

    fn draw_region_performance(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = pages::region_performance()
            .into_iter()
            .map(|r| {
                Row::new(vec![
                    r.region.to_string(),
                    r.hired.to_string(),
                    format!("₹{:.1}L", r.revenue as f64 / 100000.0),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(10),
                Constraint::Length(5),
                Constraint::Length(8),
            ],
        )
        .header(Row::new(vec!["Region", "Hired", "Revenue"]).bold())
        .block(Block::bordered().title(" Regions "));
        frame.render_widget(table, area);
    }

    // ------------------------- Analytics page ----------------------------- //

    fn draw_analytics(&self, frame: &mut Frame, area: Rect) {
        let [header, trends, bottom] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(9),
            Constraint::Length(10),
        ])
        .areas(area);

        self.draw_page_header(
            frame,
            header,
            "Analytics",
            "Hiring trends, market demand and regional split",
        );

        let [trends, radar] =
            Layout::horizontal([Constraint::Ratio(3, 4), Constraint::Ratio(1, 4)]).areas(trends);

        let radar_items: Vec<ListItem> = pages::performance_radar()
            .into_iter()
            .map(|m| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<20}", m.metric)),
                    Span::styled(format!("{:>3}", m.value), Style::default().fg(ACCENT)),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(radar_items).block(Block::bordered().title(" Scorecard ")),
            radar,
        );

        let mut chart = BarChart::default()
            .block(Block::bordered().title(" Hiring Trends (Tech/Bank/Health/Mfg) "))
            .bar_width(2)
            .bar_gap(0)
            .group_gap(2);
        for trend in pages::hiring_trends() {
            chart = chart.data(
                BarGroup::default().label(Line::from(trend.month)).bars(&[
                    Bar::default()
                        .value(trend.technology as u64)
                        .style(Style::default().fg(ACCENT)),
                    Bar::default()
                        .value(trend.banking as u64)
                        .style(Style::default().fg(Color::Blue)),
                    Bar::default()
                        .value(trend.healthcare as u64)
                        .style(Style::default().fg(Color::Magenta)),
                    Bar::default()
                        .value(trend.manufacturing as u64)
                        .style(Style::default().fg(DIM)),
                ]),
            );
        }
        frame.render_widget(chart, trends);

        let [salary, skills, regions] = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .areas(bottom);

        let salary_rows: Vec<Row> = pages::salary_distribution()
            .into_iter()
            .map(|b| {
                Row::new(vec![
                    b.range.to_string(),
                    b.count.to_string(),
                    format!("{}%", b.percentage),
                ])
            })
            .collect();
        frame.render_widget(
            Table::new(
                salary_rows,
                [
                    Constraint::Length(8),
                    Constraint::Length(6),
                    Constraint::Length(5),
                ],
            )
            .header(Row::new(vec!["Band", "Count", "Share"]).bold())
            .block(Block::bordered().title(" Salary Distribution ")),
            salary,
        );

        let skill_rows: Vec<Row> = pages::skill_demand()
            .into_iter()
            .map(|s| {
                Row::new(vec![
                    s.skill.to_string(),
                    s.demand.to_string(),
                    s.supply.to_string(),
                    s.gap.to_string(),
                ])
            })
            .collect();
        frame.render_widget(
            Table::new(
                skill_rows,
                [
                    Constraint::Min(9),
                    Constraint::Length(7),
                    Constraint::Length(7),
                    Constraint::Length(4),
                ],
            )
            .header(Row::new(vec!["Skill", "Demand", "Supply", "Gap"]).bold())
            .block(Block::bordered().title(" Skill Demand ")),
            skills,
        );

        let region_items: Vec<ListItem> = pages::region_split()
            .into_iter()
            .map(|r| {
                let bar = "█".repeat((r.value / 2) as usize);
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<10}", r.name)),
                    Span::styled(bar, Style::default().fg(ACCENT)),
                    Span::styled(format!(" {}%", r.value), Style::default().fg(DIM)),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(region_items).block(Block::bordered().title(" Regional Split ")),
            regions,
        );
    }

    // -------------------------- Schedule page ----------------------------- //

    fn draw_schedule(&self, frame: &mut Frame, area: Rect) {
        let [header, stats, body] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(CARD_ROW_HEIGHT),
            Constraint::Min(6),
        ])
        .areas(area);

        self.draw_page_header(
            frame,
            header,
            "Schedule",
            "Today's interviews and upcoming meetings",
        );

        let s = pages::interview_stats();
        let cards = [
            StatCard { label: "Today", value: s.total_today.to_string() },
            StatCard { label: "Completed", value: s.completed.to_string() },
            StatCard { label: "Upcoming", value: s.upcoming.to_string() },
            StatCard { label: "Success Rate", value: format!("{}%", s.success_rate) },
        ];
        self.draw_cards(frame, stats, &cards);

        let [today, upcoming] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(body);

        let today_items: Vec<ListItem> = pages::today_schedule()
            .into_iter()
            .map(|e| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("{:<9}", e.time), Style::default().fg(ACCENT)),
                        Span::styled(e.title, Style::default().bold()),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "          {} · {} · {} · {} · {}",
                            e.interviewer, e.duration, e.mode, e.status, e.client
                        ),
                        Style::default().fg(DIM),
                    )),
                ])
            })
            .collect();
        frame.render_widget(
            List::new(today_items).block(Block::bordered().title(" Today ")),
            today,
        );

        let mut upcoming_items: Vec<ListItem> = Vec::new();
        for day in pages::upcoming_interviews() {
            upcoming_items.push(ListItem::new(Line::from(day.date.bold())));
            for i in day.interviews {
                upcoming_items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("  {:<9}", i.time), Style::default().fg(ACCENT)),
                    Span::raw(format!("{} ({}) ", i.candidate, i.position)),
                    Span::styled(
                        format!("w/ {} @ {}", i.interviewer, i.client),
                        Style::default().fg(DIM),
                    ),
                ])));
            }
        }
        frame.render_widget(
            List::new(upcoming_items).block(Block::bordered().title(" Upcoming ")),
            upcoming,
        );
    }

    // --------------------------- Reports page ------------------------------ //

    fn draw_reports(&self, frame: &mut Frame, area: Rect) {
        let [header, available, bottom] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(7),
        ])
        .areas(area);

        self.draw_page_header(frame, header, "Reports", "Scheduled and on-demand reporting");

        let rows: Vec<Row> = pages::available_reports()
            .into_iter()
            .map(|r| {
                Row::new(vec![
                    r.name.to_string(),
                    r.kind.to_string(),
                    r.frequency.to_string(),
                    r.format.to_string(),
                    r.status.to_string(),
                    r.last_generated.to_string(),
                ])
            })
            .collect();
        frame.render_widget(
            Table::new(
                rows,
                [
                    Constraint::Min(28),
                    Constraint::Length(10),
                    Constraint::Length(10),
                    Constraint::Length(6),
                    Constraint::Length(7),
                    Constraint::Length(12),
                ],
            )
            .header(
                Row::new(vec!["Report", "Type", "Frequency", "Fmt", "Status", "Generated"]).bold(),
            )
            .block(Block::bordered().title(" Available Reports ")),
            available,
        );

        let [recent, templates] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(bottom);

        let recent_items: Vec<ListItem> = pages::recent_reports()
            .into_iter()
            .map(|r| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<30}", r.name)),
                    Span::styled(
                        format!("{} · {} · {} downloads", r.generated_on, r.size, r.downloads),
                        Style::default().fg(DIM),
                    ),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(recent_items).block(Block::bordered().title(" Recently Generated ")),
            recent,
        );

        let template_items: Vec<ListItem> = pages::report_templates()
            .into_iter()
            .map(|t| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<20}", t.name), Style::default().bold()),
                    Span::raw(t.description),
                    Span::styled(
                        format!(" ({}, ~{})", t.category, t.estimated_time),
                        Style::default().fg(DIM),
                    ),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(template_items).block(Block::bordered().title(" Templates ")),
            templates,
        );
    }

    // --------------------------- Targets page ------------------------------ //

    fn draw_targets(&self, frame: &mut Frame, area: Rect) {
        let targets = pages::organizational_targets();
        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(vec![Constraint::Length(3); targets.len()]);
        constraints.push(Constraint::Min(6));
        let slots = Layout::vertical(constraints).split(area);

        self.draw_page_header(
            frame,
            slots[0],
            "Targets",
            "Organizational and department goals",
        );

        for (target, slot) in targets.iter().zip(slots.iter().skip(1)) {
            let pct = target.percentage();
            let color = match target.status {
                "on-track" => ACCENT,
                "at-risk" => Color::Yellow,
                _ => Color::Red,
            };
            let gauge = Gauge::default()
                .block(Block::bordered().title(format!(
                    " {} — {} ({}) ",
                    target.title, target.period, target.status
                )))
                .gauge_style(Style::default().fg(color))
                .ratio((pct / 100.0).clamp(0.0, 1.0))
                .label(format!(
                    "{:.0}/{:.0} ({pct:.0}%) due {}",
                    target.achieved, target.target, target.deadline
                ));
            frame.render_widget(gauge, *slot);
        }

        let dept_rows: Vec<Row> = pages::department_targets()
            .into_iter()
            .map(|d| {
                Row::new(vec![
                    d.department.to_string(),
                    format!("{}/{}", d.achieved, d.target),
                    format!("{}%", d.percentage),
                    if d.trend == "up" { "▲".to_string() } else { "▼".to_string() },
                    format!("{} recruiters", d.recruiters),
                ])
            })
            .collect();
        frame.render_widget(
            Table::new(
                dept_rows,
                [
                    Constraint::Min(14),
                    Constraint::Length(8),
                    Constraint::Length(5),
                    Constraint::Length(3),
                    Constraint::Length(14),
                ],
            )
            .header(Row::new(vec!["Department", "Achieved", "%", "", "Team"]).bold())
            .block(Block::bordered().title(" Department Targets ")),
            slots[slots.len() - 1],
        );
    }

    // ------------------------ Record detail view --------------------------- //

    fn draw_record_detail(&self, record: &Record, frame: &mut Frame, area: Rect) {
        let name = record
            .get("name")
            .map(|v| v.display())
            .unwrap_or_else(|| "record".to_string());
        let rows: Vec<Row> = record
            .fields()
            .map(|(key, value)| Row::new(vec![key.to_string(), value.display()]))
            .collect();
        let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(20)])
            .header(Row::new(vec!["Field", "Value"]).bold())
            .block(Block::bordered().title(format!(" R[{name}] — Esc to close ")));
        frame.render_widget(table, area);
    }

    // ------------------------------ Popup ---------------------------------- //

    fn draw_popup(&self, model: &Model, frame: &mut Frame) {
        let area = centered_rect(frame.area(), 64, 18);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(model.popup_message())
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(" Help ".bold())),
            area,
        );
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 80, 24);
        let inner = centered_rect(outer, 64, 18);
        assert!(inner.width <= outer.width && inner.height <= outer.height);
        assert_eq!(inner.x, 8);
        assert_eq!(inner.y, 3);

        // Never larger than the terminal itself.
        let tiny = Rect::new(0, 0, 10, 5);
        let clamped = centered_rect(tiny, 64, 18);
        assert_eq!(clamped.width, 10);
        assert_eq!(clamped.height, 5);
    }
}
