use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use yew::prelude::*;

use crate::format::format_currency;

const TREND_WIDTH: f64 = 600.0;
const TREND_HEIGHT: f64 = 200.0;
const TREND_PADDING: f64 = 16.0;

/// Width of a bar as a percentage of the largest value, clamped to 0..=100.
fn bar_percent(value: Decimal, max: Decimal) -> f64 {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0.0;
    }
    let ratio = (value / max).to_f64().unwrap_or(0.0);
    (ratio * 100.0).clamp(0.0, 100.0)
}

/// SVG polyline coordinates for `values`, spread evenly across the box with
/// the largest value touching the top edge.
fn polyline_points(values: &[Decimal], width: f64, height: f64, padding: f64) -> Vec<(f64, f64)> {
    let max = values.iter().copied().max().unwrap_or(Decimal::ZERO);
    let inner_w = width - padding * 2.0;
    let inner_h = height - padding * 2.0;
    let step = if values.len() > 1 {
        inner_w / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = if values.len() > 1 {
                padding + step * i as f64
            } else {
                width / 2.0
            };
            let y = height - padding - inner_h * bar_percent(*value, max) / 100.0;
            (x, y)
        })
        .collect()
}

fn empty_state() -> Html {
    html! {
        <div class="py-10 text-center text-sm text-muted-foreground">{"No expenses to display"}</div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ChartProps {
    pub points: Vec<(String, Decimal)>,
    pub currency_symbol: String,
}

#[function_component(BarChart)]
pub fn bar_chart(props: &ChartProps) -> Html {
    if props.points.is_empty() {
        return empty_state();
    }
    let max = props
        .points
        .iter()
        .map(|(_, value)| *value)
        .max()
        .unwrap_or(Decimal::ZERO);

    html! {
        <div class="space-y-3">
            { for props.points.iter().map(|(label, value)| {
                let width = format!("width: {:.1}%", bar_percent(*value, max));
                html! {
                    <div>
                        <div class="flex justify-between text-[12px] mb-1">
                            <span class="font-semibold text-[#173E63]">{ label.clone() }</span>
                            <span class="text-muted-foreground">{ format_currency(*value, &props.currency_symbol) }</span>
                        </div>
                        <div class="h-2.5 w-full bg-[#eef4f9] rounded-full overflow-hidden">
                            <div class="h-full bg-[#1D617A] rounded-full" style={width}></div>
                        </div>
                    </div>
                }
            }) }
        </div>
    }
}

#[function_component(TrendChart)]
pub fn trend_chart(props: &ChartProps) -> Html {
    if props.points.is_empty() {
        return empty_state();
    }
    let values: Vec<Decimal> = props.points.iter().map(|(_, v)| *v).collect();
    let coords = polyline_points(&values, TREND_WIDTH, TREND_HEIGHT, TREND_PADDING);
    let path = coords
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ");
    let view_box = format!("0 0 {} {}", TREND_WIDTH, TREND_HEIGHT);

    html! {
        <div>
            <svg viewBox={view_box} class="w-full h-48">
                <polyline points={path} fill="none" stroke="#1D617A" stroke-width="3" stroke-linejoin="round" />
                { for coords.iter().zip(props.points.iter()).map(|((x, y), (label, value))| html! {
                    <circle cx={format!("{:.1}", x)} cy={format!("{:.1}", y)} r="4" fill="#173E63">
                        <title>{ format!("{}: {}", label, format_currency(*value, &props.currency_symbol)) }</title>
                    </circle>
                }) }
            </svg>
            <div class="flex justify-between text-[10px] text-muted-foreground mt-2">
                { for props.points.iter().map(|(label, _)| html! { <span>{ label.clone() }</span> }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Decimal::from(50), Decimal::from(200), 25.0)]
    #[case(Decimal::from(200), Decimal::from(200), 100.0)]
    #[case(Decimal::ZERO, Decimal::from(200), 0.0)]
    #[case(Decimal::from(10), Decimal::ZERO, 0.0)]
    fn bars_scale_against_the_largest_value(
        #[case] value: Decimal,
        #[case] max: Decimal,
        #[case] expected: f64,
    ) {
        assert!((bar_percent(value, max) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_peak_touches_the_top_padding() {
        let values = [Decimal::from(10), Decimal::from(40), Decimal::from(20)];
        let coords = polyline_points(&values, 100.0, 100.0, 10.0);

        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0].0, 10.0);
        assert_eq!(coords[2].0, 90.0);
        assert!((coords[1].1 - 10.0).abs() < 1e-9);
        assert!(coords[0].1 > coords[2].1);
    }

    #[test]
    fn single_point_is_centered() {
        let coords = polyline_points(&[Decimal::from(5)], 100.0, 100.0, 10.0);
        assert_eq!(coords, vec![(50.0, 10.0)]);
    }
}
