//! Report generation tools
//!
//! Generate a PDF nutrition report: daily intake table against the GET target
//! and a calorie trend chart.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use printpdf::*;
use serde::Serialize;

use crate::app::AppState;
use crate::models::{DailyLog, Macros};
use crate::nutrition::aggregate;

use super::profile::ONBOARDING_HINT;

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (16, 124, 92); // Emerald
const COLOR_UNDER: (u8, u8, u8) = (0, 176, 80); // Green
const COLOR_OVER: (u8, u8, u8) = (255, 0, 0); // Red
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub days_analyzed: usize,
    pub total_entries: usize,
    pub average_calories: f64,
    pub target_calories: i64,
    pub date_range: String,
    pub message: String,
}

/// Consumed totals for one logged day
#[derive(Debug, Clone, Serialize)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    pub day_of_week: &'static str,
    pub entry_count: usize,
    pub consumed: Macros,
}

// ============================================================================
// Statistics Aggregation
// ============================================================================

fn day_of_week_abbrev(date: &NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Days in `[start, end]` with at least one entry, oldest first
pub fn collect_daily_nutrition(log: &DailyLog, start: NaiveDate, end: NaiveDate) -> Vec<DailyNutrition> {
    log.iter()
        .filter(|(date, entries)| *date >= start && *date <= end && !entries.is_empty())
        .map(|(date, entries)| DailyNutrition {
            date,
            day_of_week: day_of_week_abbrev(&date),
            entry_count: entries.len(),
            consumed: aggregate(entries),
        })
        .collect()
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Daily calorie trend with the target as a reference line, as PNG bytes
pub fn generate_calorie_chart(days: &[DailyNutrition], target: i64, width: u32, height: u32) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if days.is_empty() {
        return Err("No data to chart".to_string());
    }

    let target = target as f64;
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let y_max = days.iter()
            .map(|d| d.consumed.calories)
            .fold(target, f64::max) * 1.15;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..(days.len() as i32), 0.0..y_max)
            .map_err(|e| e.to_string())?;

        chart.configure_mesh()
            .x_labels(days.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < days.len() {
                    days[*x as usize].date.format("%d/%m").to_string()
                } else {
                    String::new()
                }
            })
            .y_desc("kcal")
            .draw()
            .map_err(|e| e.to_string())?;

        // Target line
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0, target), (days.len() as i32, target)],
            ShapeStyle::from(&RGBColor(255, 0, 0).mix(0.6)).stroke_width(2),
        )))
        .map_err(|e| e.to_string())?
        .label("Target (GET)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RGBColor(255, 0, 0).mix(0.6).stroke_width(2)));

        let points: Vec<(i32, f64)> = days.iter()
            .enumerate()
            .map(|(i, d)| (i as i32, d.consumed.calories))
            .collect();

        let line_color = RGBColor(COLOR_TITLE.0, COLOR_TITLE.1, COLOR_TITLE.2);
        chart.draw_series(LineSeries::new(points.clone(), line_color.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label("Consumed")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(2)));

        chart.draw_series(points.iter().map(|(x, y)| {
            let (r, g, b) = if *y > target { COLOR_OVER } else { COLOR_UNDER };
            Circle::new((*x, *y), 4, RGBColor(r, g, b).filled())
        })).map_err(|e| e.to_string())?;

        chart.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    let dyn_img = DynamicImage::ImageRgb8(img);
    dyn_img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Generation Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(layer: &PdfLayerReference, x1: Mm, y1: Mm, x2: Mm, y2: Mm, color: (u8, u8, u8), width: f32) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![
            (Point::new(x1, y1), false),
            (Point::new(x2, y2), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

// ============================================================================
// Nutrition Report Generation
// ============================================================================

/// Rows that fit on the first page below the summary block
const MAX_TABLE_ROWS: usize = 40;

/// Generate a nutrition PDF report for `[start_date, end_date]`
pub fn generate_nutrition_report(
    state: &AppState,
    start_date: NaiveDate,
    end_date: NaiveDate,
    output_path: &str,
) -> Result<GenerateReportResponse, String> {
    if end_date < start_date {
        return Err(format!("End date {} is before start date {}", end_date, start_date));
    }

    let profile = state.profile().ok_or_else(|| ONBOARDING_HINT.to_string())?;
    let target = state.daily_target().map_err(|e| e.to_string())?;

    let days = collect_daily_nutrition(state.log(), start_date, end_date);
    if days.is_empty() {
        return Err(format!("No logged food found between {} and {}", start_date, end_date));
    }

    let days_analyzed = days.len();
    let total_entries: usize = days.iter().map(|d| d.entry_count).sum();
    let average: Macros = days.iter().map(|d| d.consumed).sum::<Macros>() * (1.0 / days_analyzed as f64);
    let days_over_target = days.iter().filter(|d| d.consumed.calories > target as f64).count();

    // Page 1 - Portrait summary and table
    let (doc, page1, layer1) = PdfDocument::new(
        "Nutrition Report",
        Mm(215.9),  // Letter width
        Mm(279.4),  // Letter height
        "Layer 1",
    );

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| e.to_string())?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| e.to_string())?;

    let layer = doc.get_page(page1).get_layer(layer1);

    let page_height = 279.4;
    let margin_left = 15.0;
    let mut y = page_height - 20.0;

    add_text(&layer, &font_bold, "Nutrition Report", Mm(margin_left), Mm(y), 18.0, COLOR_TITLE);
    y -= 10.0;

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    add_text(&layer, &font, &format!("Name: {}", profile.name), Mm(margin_left), Mm(y), 11.0, COLOR_BLACK);
    add_text(&layer, &font, &format!("Generated: {}", now), Mm(120.0), Mm(y), 11.0, COLOR_BLACK);
    y -= 6.0;
    add_text(&layer, &font, &format!("Report Period: {} to {}", start_date, end_date), Mm(margin_left), Mm(y), 11.0, COLOR_BLACK);
    y -= 6.0;

    add_line(&layer, Mm(margin_left), Mm(y), Mm(200.0), Mm(y), COLOR_GRAY, 0.5);
    y -= 8.0;

    add_text(&layer, &font_bold, "Summary", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
    y -= 6.0;
    add_text(&layer, &font, &format!("Daily Target (GET): {} kcal", target), Mm(margin_left), Mm(y), 10.0, COLOR_BLACK);
    add_text(&layer, &font, &format!("Days Logged: {}", days_analyzed), Mm(100.0), Mm(y), 10.0, COLOR_BLACK);
    y -= 5.0;
    let average_color = if average.calories > target as f64 { COLOR_OVER } else { COLOR_UNDER };
    add_text(&layer, &font, &format!("Average Intake: {:.0} kcal", average.calories), Mm(margin_left), Mm(y), 10.0, average_color);
    add_text(&layer, &font, &format!("Days Over Target: {}", days_over_target), Mm(100.0), Mm(y), 10.0, COLOR_BLACK);
    y -= 5.0;
    add_text(
        &layer,
        &font,
        &format!("Average Macros: {:.0} g protein, {:.0} g carbs, {:.0} g fat", average.protein, average.carbs, average.fat),
        Mm(margin_left),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 10.0;

    add_text(&layer, &font_bold, "Daily Intake", Mm(margin_left), Mm(y), 12.0, COLOR_BLACK);
    y -= 6.0;

    let headers = ["Date", "Day", "Items", "kcal", "Protein", "Carbs", "Fat", "% Target"];
    let col_positions = [15.0, 42.0, 58.0, 75.0, 98.0, 121.0, 144.0, 164.0];
    for (header, col_x) in headers.iter().zip(col_positions.iter()) {
        add_text(&layer, &font_bold, header, Mm(*col_x), Mm(y), 9.0, COLOR_BLACK);
    }
    y -= 2.0;
    add_line(&layer, Mm(margin_left), Mm(y), Mm(200.0), Mm(y), COLOR_GRAY, 0.3);
    y -= 4.5;

    for day in days.iter().rev().take(MAX_TABLE_ROWS) {
        let percent = if target > 0 { day.consumed.calories / target as f64 * 100.0 } else { 0.0 };
        let color = if day.consumed.calories > target as f64 { COLOR_OVER } else { COLOR_BLACK };
        let values = [
            day.date.to_string(),
            day.day_of_week.to_string(),
            day.entry_count.to_string(),
            format!("{:.0}", day.consumed.calories),
            format!("{:.1} g", day.consumed.protein),
            format!("{:.1} g", day.consumed.carbs),
            format!("{:.1} g", day.consumed.fat),
            format!("{:.0}%", percent),
        ];
        for (value, col_x) in values.iter().zip(col_positions.iter()) {
            add_text(&layer, &font, value, Mm(*col_x), Mm(y), 8.0, color);
        }
        y -= 4.5;
    }
    if days_analyzed > MAX_TABLE_ROWS {
        add_text(
            &layer,
            &font,
            &format!("... {} earlier days not shown", days_analyzed - MAX_TABLE_ROWS),
            Mm(margin_left),
            Mm(y),
            8.0,
            COLOR_GRAY,
        );
    }

    // Page 2 - Landscape for Chart
    let (page2, layer2) = doc.add_page(Mm(279.4), Mm(215.9), "Chart Page");
    let layer2 = doc.get_page(page2).get_layer(layer2);

    let landscape_height = 215.9;
    let mut y2 = landscape_height - 20.0;

    add_text(&layer2, &font_bold, "Calorie Trend", Mm(margin_left), Mm(y2), 16.0, COLOR_TITLE);
    add_text(&layer2, &font, &format!("{} - {}", start_date, end_date), Mm(120.0), Mm(y2), 11.0, COLOR_BLACK);
    y2 -= 10.0;

    match generate_calorie_chart(&days, target, 1000, 400) {
        Ok(png_bytes) => {
            let dynamic_image = printpdf::image_crate::load_from_memory(&png_bytes)
                .map_err(|e| e.to_string())?;
            let pdf_image = Image::from_dynamic_image(&dynamic_image);

            // 1000x400 pixels at 120 DPI is about 212mm x 85mm
            let transform = ImageTransform {
                translate_x: Some(Mm(margin_left)),
                translate_y: Some(Mm(y2 - 90.0)),
                dpi: Some(120.0),
                ..Default::default()
            };

            pdf_image.add_to_layer(layer2.clone(), transform);
            y2 -= 95.0;
        }
        Err(e) => {
            add_text(&layer2, &font, &format!("Chart generation error: {}", e), Mm(margin_left), Mm(y2 - 10.0), 9.0, COLOR_OVER);
            y2 -= 15.0;
        }
    }

    y2 -= 5.0;
    add_text(&layer2, &font_bold, "Legend:", Mm(margin_left), Mm(y2), 10.0, COLOR_BLACK);
    add_text(&layer2, &font, "At or under target", Mm(45.0), Mm(y2), 10.0, COLOR_UNDER);
    add_text(&layer2, &font, "Over target", Mm(100.0), Mm(y2), 10.0, COLOR_OVER);

    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| e.to_string())?;

    Ok(GenerateReportResponse {
        success: true,
        file_path: output_path.to_string(),
        days_analyzed,
        total_entries,
        average_calories: average.calories,
        target_calories: target,
        date_range: format!("{} to {}", start_date, end_date),
        message: format!("Nutrition report generated with {} entries over {} days", total_entries, days_analyzed),
    })
}
