/// JSON sampling report mirroring what the chart would render.
use std::path::Path;

use constants::colour::Rgba;
use point_cloud_sampling::ChartNode;
use serde::Serialize;

#[derive(Serialize)]
pub struct ClassReport {
    pub name: String,
    pub total_count: usize,
    pub display_percent: f64,
    pub display_count: usize,
    pub visible: bool,
    pub colour: Rgba,
}

#[derive(Serialize)]
pub struct SamplingReport {
    pub source: String,
    pub total_points: u64,
    pub rendered_points: usize,
    pub classes: Vec<ClassReport>,
}

impl SamplingReport {
    pub fn from_node(source: &Path, total_points: u64, node: &ChartNode) -> Self {
        let classes: Vec<ClassReport> = node
            .displays()
            .iter()
            .map(|display| ClassReport {
                name: display.name().to_string(),
                total_count: display.position_count(),
                display_percent: display.display_percent(),
                display_count: display.display_count(),
                visible: display.is_visible(),
                colour: display.colour(),
            })
            .collect();
        let rendered_points = classes.iter().map(|class| class.display_count).sum();
        Self {
            source: source.display().to_string(),
            total_points,
            rendered_points,
            classes,
        }
    }

    pub fn print_summary(&self) {
        println!("Sampling complete:");
        for class in &self.classes {
            println!(
                "  {}: {} of {} points ({:.2}%){}",
                class.name,
                class.display_count,
                class.total_count,
                class.display_percent,
                if class.visible { "" } else { " [hidden]" }
            );
        }
        let dataset_share = if self.total_points > 0 {
            self.rendered_points as f64 / self.total_points as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "  Rendered: {} of {} points ({:.1}% of dataset)",
            self.rendered_points, self.total_points, dataset_share
        );
    }
}
