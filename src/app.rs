use crate::catalog::{distribution_props, function_props, visualization_props};
use crate::commands::Command;
use crate::diagram::{self, DiagramLink, DiagramModel, DiagramNode};
use crate::editor_state::check_editor_state;
use crate::effects::Effect;
use crate::nodes::{
    DistributionKind, ExpectedValueType, FunctionKind, NodeType, VisualizationKind,
};
use crate::state::State;
use crate::workbench::WorkbenchState;
use eframe::egui;
use std::collections::HashMap;

// UI Constants
const NODE_WIDTH: f32 = 170.0;
const NODE_HEADER_HEIGHT: f32 = 36.0;
const PORT_ROW_HEIGHT: f32 = 18.0;
const PORT_RADIUS: f32 = 4.0;
const EDITOR_PANEL_WIDTH: f32 = 280.0;
const LINK_STROKE_WIDTH: f32 = 1.5;
const LINK_PREVIEW_STROKE_WIDTH: f32 = 2.0;
const LINK_PREVIEW_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 100, 255);

/// Transient pointer state for an in-progress node drag.
struct NodeDrag {
    node_id: String,
    delta: egui::Vec2,
}

pub struct WorkbenchApp {
    state: State,
    drag: Option<NodeDrag>,
    /// Node whose output port was clicked; the next input-port click
    /// completes the link.
    pending_link_from: Option<String>,
}

impl WorkbenchApp {
    pub fn new(state: State) -> Self {
        Self {
            state,
            drag: None,
            pending_link_from: None,
        }
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The UI reads a snapshot and communicates only through commands
        // and effects, applied in one batch at the end of the frame.
        let workbench = self.state.store.workbench.clone();
        let mut commands: Vec<Command> = Vec::new();
        let mut effects: Vec<Effect> = Vec::new();

        // Menu bar at the very top
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save").clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .save_file()
                        {
                            effects.push(Effect::SaveToFile { path });
                        }
                    }

                    if ui.button("Load").clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            effects.push(Effect::LoadFromFile { path });
                        }
                    }
                });

                if ui.button("Add Node").clicked() {
                    commands.push(Command::AddNode);
                }

                ui.label(format!(
                    "{}: Belief Workbench",
                    workbench.beliefs.model_name
                ));
            });
        });

        if workbench.currently_editing.is_some() {
            egui::SidePanel::right("node_editor")
                .exact_width(EDITOR_PANEL_WIDTH)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(8.0),
                )
                .show(ctx, |ui| {
                    render_editor_form(ui, &workbench, &mut commands);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui, &workbench, &mut commands);
        });

        // Display error dialog if there's an error message
        if let Some(error) = self.state.store.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.state.store.error_message = None;
                    }
                });
        }

        for command in commands {
            self.state.dispatch(command);
        }
        for effect in effects {
            self.state.request(effect);
        }
        self.state.flush_commands();
        self.state.flush_effects();
    }
}

// ------------------------------------------------------------------
// Editor form
// ------------------------------------------------------------------

fn render_editor_form(
    ui: &mut egui::Ui,
    workbench: &WorkbenchState,
    commands: &mut Vec<Command>,
) {
    let Some(original_title) = workbench.currently_editing.as_deref() else {
        return;
    };
    let mut form = workbench.new_properties.clone();

    ui.heading("Node Properties");
    ui.separator();

    ui.label("Title");
    ui.text_edit_singleline(&mut form.title);

    ui.label("Justification");
    ui.text_edit_multiline(&mut form.justification);

    ui.label("Node Type");
    egui::ComboBox::from_id_salt("node_type")
        .selected_text(form.node_type.label())
        .show_ui(ui, |ui| {
            for node_type in NodeType::ALL {
                ui.selectable_value(
                    &mut form.node_type,
                    node_type,
                    node_type.label(),
                );
            }
        });

    match form.node_type {
        NodeType::Distribution => {
            ui.label("Distribution");
            egui::ComboBox::from_id_salt("distribution")
                .selected_text(distribution_props(form.distribution).name)
                .show_ui(ui, |ui| {
                    for kind in DistributionKind::ALL {
                        ui.selectable_value(
                            &mut form.distribution,
                            kind,
                            distribution_props(kind).name,
                        );
                    }
                });
        }
        NodeType::Function => {
            ui.label("Function");
            egui::ComboBox::from_id_salt("function")
                .selected_text(function_props(form.function).name)
                .show_ui(ui, |ui| {
                    for kind in FunctionKind::ALL {
                        ui.selectable_value(
                            &mut form.function,
                            kind,
                            function_props(kind).name,
                        );
                    }
                });
        }
        NodeType::Visualization => {
            ui.label("Visualization");
            egui::ComboBox::from_id_salt("visualization")
                .selected_text(visualization_props(form.visualization).name)
                .show_ui(ui, |ui| {
                    for kind in VisualizationKind::ALL {
                        ui.selectable_value(
                            &mut form.visualization,
                            kind,
                            visualization_props(kind).name,
                        );
                    }
                });
        }
        NodeType::Constant | NodeType::Constraint => {}
    }

    if form.node_type.has_value_field() {
        ui.label("Value Type");
        egui::ComboBox::from_id_salt("value_type")
            .selected_text(form.value_type.label())
            .show_ui(ui, |ui| {
                for value_type in ExpectedValueType::ALL {
                    ui.selectable_value(
                        &mut form.value_type,
                        value_type,
                        value_type.label(),
                    );
                }
            });

        ui.label("Value");
        ui.text_edit_singleline(&mut form.value);
    }

    let all_titles: Vec<&String> = workbench.beliefs.nodes.keys().collect();
    let validity = check_editor_state(&all_titles, original_title, &form);
    for message in &validity.messages {
        ui.colored_label(egui::Color32::RED, message);
    }

    // Form changes are dispatched before the buttons are handled, so a
    // same-frame commit always sees the latest form state.
    if form != workbench.new_properties {
        commands.push(Command::UpdateEditorState {
            new_state: form.clone(),
        });
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(validity.is_valid, egui::Button::new("Save"))
            .clicked()
        {
            commands.push(Command::FinishEditingNode);
        }
        if ui.button("Cancel").clicked() {
            commands.push(Command::CancelEditingNode);
        }
    });
}

// ------------------------------------------------------------------
// Canvas
// ------------------------------------------------------------------

fn node_height(node: &DiagramNode) -> f32 {
    NODE_HEADER_HEIGHT + PORT_ROW_HEIGHT * node.input_ports.len().max(1) as f32
}

fn node_rect(origin: egui::Pos2, node: &DiagramNode, delta: egui::Vec2) -> egui::Rect {
    let pos = origin
        + egui::vec2(node.coords[0] as f32, node.coords[1] as f32)
        + delta;
    egui::Rect::from_min_size(pos, egui::vec2(NODE_WIDTH, node_height(node)))
}

impl WorkbenchApp {
    fn render_canvas(
        &mut self,
        ui: &mut egui::Ui,
        workbench: &WorkbenchState,
        commands: &mut Vec<Command>,
    ) {
        let before = diagram::diagram_model(&workbench.beliefs.nodes);
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let origin = response.rect.min;

        if response.clicked() {
            self.pending_link_from = None;
        }

        // Lay out nodes first so link endpoints can be looked up by port id.
        let mut port_positions: HashMap<String, egui::Pos2> = HashMap::new();
        for node in &before.nodes {
            let delta = match &self.drag {
                Some(drag) if drag.node_id == node.id => drag.delta,
                _ => egui::Vec2::ZERO,
            };
            let rect = node_rect(origin, node, delta);
            for (row, port) in node.input_ports.iter().enumerate() {
                port_positions.insert(
                    port.id.clone(),
                    egui::pos2(
                        rect.left(),
                        rect.top()
                            + NODE_HEADER_HEIGHT
                            + PORT_ROW_HEIGHT * (row as f32 + 0.5),
                    ),
                );
            }
            port_positions.insert(
                node.output_port.id.clone(),
                egui::pos2(rect.right(), rect.center().y),
            );
        }

        let link_stroke = egui::Stroke::new(
            LINK_STROKE_WIDTH,
            ui.visuals().widgets.noninteractive.fg_stroke.color,
        );
        for link in &before.links {
            if let (Some(&from), Some(&to)) = (
                port_positions.get(&link.from_port),
                port_positions.get(&link.to_port),
            ) {
                painter.line_segment([from, to], link_stroke);
                if !link.label.is_empty() {
                    painter.text(
                        ((from.to_vec2() + to.to_vec2()) / 2.0).to_pos2(),
                        egui::Align2::CENTER_BOTTOM,
                        &link.label,
                        egui::FontId::proportional(10.0),
                        ui.visuals().weak_text_color(),
                    );
                }
            }
        }

        for node in &before.nodes {
            self.render_node(ui, &painter, origin, &before, node, commands);
        }

        // Preview line from the pending output port to the pointer.
        if let Some(from_id) = &self.pending_link_from
            && let Some(&from) =
                port_positions.get(&diagram::encode_output_port(from_id))
            && let Some(pointer) = ui.input(|i| i.pointer.hover_pos())
        {
            painter.line_segment(
                [from, pointer],
                egui::Stroke::new(LINK_PREVIEW_STROKE_WIDTH, LINK_PREVIEW_COLOR),
            );
        }
    }

    fn render_node(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        origin: egui::Pos2,
        before: &DiagramModel,
        node: &DiagramNode,
        commands: &mut Vec<Command>,
    ) {
        let delta = match &self.drag {
            Some(drag) if drag.node_id == node.id => drag.delta,
            _ => egui::Vec2::ZERO,
        };
        let rect = node_rect(origin, node, delta);
        // Registered before the port and delete regions so those stay on
        // top and receive overlapping clicks.
        let body_response = ui.interact(
            rect,
            ui.id().with(("node", &node.id)),
            egui::Sense::click_and_drag(),
        );
        let fill = if Some(&node.id)
            == self.state.store.workbench.currently_editing.as_ref()
        {
            ui.visuals().widgets.active.bg_fill
        } else {
            ui.visuals().widgets.inactive.bg_fill
        };
        painter.rect_filled(rect, 4.0, fill);
        painter.rect_stroke(
            rect,
            4.0,
            ui.visuals().widgets.noninteractive.bg_stroke,
            egui::epaint::StrokeKind::Outside,
        );
        painter.text(
            rect.left_top() + egui::vec2(6.0, 4.0),
            egui::Align2::LEFT_TOP,
            &node.title,
            egui::FontId::proportional(13.0),
            ui.visuals().strong_text_color(),
        );
        painter.text(
            rect.left_top() + egui::vec2(6.0, 20.0),
            egui::Align2::LEFT_TOP,
            &node.subtitle,
            egui::FontId::proportional(10.0),
            ui.visuals().weak_text_color(),
        );

        // Delete affordance in the top-right corner
        let delete_rect = egui::Rect::from_min_size(
            rect.right_top() + egui::vec2(-16.0, 2.0),
            egui::vec2(14.0, 14.0),
        );
        let delete_response = ui.interact(
            delete_rect,
            ui.id().with(("delete", &node.id)),
            egui::Sense::click(),
        );
        painter.text(
            delete_rect.center(),
            egui::Align2::CENTER_CENTER,
            "✕",
            egui::FontId::proportional(11.0),
            if delete_response.hovered() {
                egui::Color32::RED
            } else {
                ui.visuals().weak_text_color()
            },
        );
        if delete_response.clicked() {
            commands.push(Command::DeleteNode {
                node_id_to_delete: node.id.clone(),
            });
            return;
        }

        // Input ports down the left edge
        for (row, port) in node.input_ports.iter().enumerate() {
            let center = egui::pos2(
                rect.left(),
                rect.top() + NODE_HEADER_HEIGHT + PORT_ROW_HEIGHT * (row as f32 + 0.5),
            );
            let port_rect =
                egui::Rect::from_center_size(center, egui::Vec2::splat(12.0));
            let port_response = ui.interact(
                port_rect,
                ui.id().with(("input", &port.id)),
                egui::Sense::click(),
            );
            painter.circle_filled(
                center,
                PORT_RADIUS,
                if port_response.hovered() {
                    LINK_PREVIEW_COLOR
                } else {
                    ui.visuals().widgets.inactive.fg_stroke.color
                },
            );
            painter.text(
                center + egui::vec2(8.0, 0.0),
                egui::Align2::LEFT_CENTER,
                &port.label,
                egui::FontId::proportional(10.0),
                ui.visuals().text_color(),
            );

            if port_response.clicked() {
                if let Some(from_id) = self.pending_link_from.take() {
                    let mut after = before.clone();
                    after.links.push(DiagramLink {
                        from_port: diagram::encode_output_port(&from_id),
                        to_port: port.id.clone(),
                        label: String::new(),
                    });
                    commands.extend(diagram::diagram_changes(before, &after));
                }
            }
            // Secondary click clears the port's incoming links.
            if port_response.secondary_clicked() {
                let mut after = before.clone();
                after.links.retain(|link| {
                    link.from_port != port.id && link.to_port != port.id
                });
                commands.extend(diagram::diagram_changes(before, &after));
            }
        }

        // Single output port on the right edge
        let out_center = egui::pos2(rect.right(), rect.center().y);
        let out_rect =
            egui::Rect::from_center_size(out_center, egui::Vec2::splat(12.0));
        let out_response = ui.interact(
            out_rect,
            ui.id().with(("output", &node.output_port.id)),
            egui::Sense::click(),
        );
        painter.circle_filled(
            out_center,
            PORT_RADIUS,
            if out_response.hovered()
                || self.pending_link_from.as_deref() == Some(node.id.as_str())
            {
                LINK_PREVIEW_COLOR
            } else {
                ui.visuals().widgets.inactive.fg_stroke.color
            },
        );
        if out_response.clicked() {
            self.pending_link_from = Some(node.id.clone());
        }

        // Body: click opens the editor, drag moves the node.
        if body_response.clicked() {
            commands.push(Command::StartEditingNode {
                to_edit: node.id.clone(),
            });
        }
        if body_response.dragged() {
            let drag = self.drag.get_or_insert_with(|| NodeDrag {
                node_id: node.id.clone(),
                delta: egui::Vec2::ZERO,
            });
            if drag.node_id == node.id {
                drag.delta += body_response.drag_delta();
            }
        }
        if body_response.drag_stopped()
            && let Some(drag) = self.drag.take()
            && drag.node_id == node.id
        {
            let mut after = before.clone();
            if let Some(moved) =
                after.nodes.iter_mut().find(|n| n.id == drag.node_id)
            {
                moved.coords = [
                    moved.coords[0] + drag.delta.x as f64,
                    moved.coords[1] + drag.delta.y as f64,
                ];
            }
            commands.extend(diagram::diagram_changes(before, &after));
        }
    }
}
