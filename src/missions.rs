use crate::model::{MissionConfig, MissionId};

pub const MISSIONS: [MissionConfig; 5] = [
    MissionConfig {
        id: MissionId::Sequences,
        title: "Pattern Hunter",
        description: "Crack arithmetic and geometric sequences and find the missing term.",
        image_url: "/images/sequences.jpg",
        gradient: "linear-gradient(135deg, #0ea5e9, #4f46e5)",
        color: "#38bdf8",
        icon: "∑",
    },
    MissionConfig {
        id: MissionId::Equations,
        title: "Equation Escape",
        description: "Balance both sides and solve for the unknown.",
        image_url: "/images/equations.jpg",
        gradient: "linear-gradient(135deg, #8b5cf6, #c026d3)",
        color: "#a78bfa",
        icon: "x",
    },
    MissionConfig {
        id: MissionId::Geometry,
        title: "Shape Architect",
        description: "Work out areas, perimeters and volumes of real-world shapes.",
        image_url: "/images/geometry.jpg",
        gradient: "linear-gradient(135deg, #10b981, #0d9488)",
        color: "#34d399",
        icon: "△",
    },
    MissionConfig {
        id: MissionId::Percentages,
        title: "Market Day",
        description: "Discounts, interest and ratios from everyday shopping.",
        image_url: "/images/percentages.jpg",
        gradient: "linear-gradient(135deg, #f59e0b, #ea580c)",
        color: "#fbbf24",
        icon: "%",
    },
    MissionConfig {
        id: MissionId::Statistics,
        title: "Data Detective",
        description: "Read the data and find the mean, median and mode.",
        image_url: "/images/statistics.jpg",
        gradient: "linear-gradient(135deg, #f43f5e, #db2777)",
        color: "#fb7185",
        icon: "≈",
    },
];

pub fn mission(id: MissionId) -> &'static MissionConfig {
    let index = match id {
        MissionId::Sequences => 0,
        MissionId::Equations => 1,
        MissionId::Geometry => 2,
        MissionId::Percentages => 3,
        MissionId::Statistics => 4,
    };
    &MISSIONS[index]
}

impl MissionId {
    /// Topic guidance handed to the problem generator.
    pub fn topic_brief(self) -> &'static str {
        match self {
            MissionId::Sequences => {
                "number sequences (arithmetic or geometric). Put the visible terms in \
                 sequenceData, e.g. \"3, 7, 11, 15, ?\", and ask for the missing term"
            }
            MissionId::Equations => {
                "linear equations in one unknown, posed either symbolically or as a short \
                 word problem; the answer is the value of the unknown"
            }
            MissionId::Geometry => {
                "area, perimeter or volume of everyday shapes; always set variableUnit \
                 to the unit of the answer, e.g. \"cm²\""
            }
            MissionId::Percentages => {
                "percentages, discounts, simple interest or ratios in a shopping or money \
                 context; set variableUnit when the answer carries a unit"
            }
            MissionId::Statistics => {
                "mean, median, mode or range of a small data set; list the data in \
                 sequenceData"
            }
        }
    }
}
