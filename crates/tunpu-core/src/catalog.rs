//! Built-in item registries: agents, hero cards, quick-action chips and the
//! service directory. The synchronizer only needs the agent count; the rest
//! is read by the front-end.

pub const SCENIC_NAME: &str = "云峰屯堡";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weather {
    pub day: &'static str,
    pub temp: &'static str,
    pub date: &'static str,
    pub condition: &'static str,
}

pub const WEATHER: Weather = Weather {
    day: "周三",
    temp: "19°C",
    date: "12/10",
    condition: "Sunny",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Guide,
    Culture,
    Planning,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub kind: AgentKind,
    pub description: &'static str,
    pub default_prompt: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredTag {
    pub label: &'static str,
    /// 0-100
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoColor {
    Green,
    Yellow,
    Red,
    Purple,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsefulInfo {
    pub color: InfoColor,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    Efficient,
    Friendly,
    Enthusiastic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroCard {
    pub id: &'static str,
    pub name: &'static str,
    pub tagline: &'static str,
    pub style: CardStyle,
    pub actions: [CardAction; 2],
    pub tags: [ScoredTag; 3],
    pub description: &'static str,
    pub info: UsefulInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip {
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceItem {
    pub name: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceCategory {
    pub title: &'static str,
    pub items: &'static [ServiceItem],
}

static AGENTS: [Agent; 6] = [
    Agent {
        id: "guide",
        name: "引路人",
        role: "Guide",
        kind: AgentKind::Guide,
        description: "景区路线规划",
        default_prompt: Some("我在大门，请带我去最近的景点。"),
    },
    Agent {
        id: "story",
        name: "说书人",
        role: "Storyteller",
        kind: AgentKind::Culture,
        description: "历史文化讲解",
        default_prompt: Some("给我讲讲这里发生的历史故事吧。"),
    },
    Agent {
        id: "event",
        name: "活动助手",
        role: "Event Assistant",
        kind: AgentKind::Planning,
        description: "演出活动资讯",
        default_prompt: Some("今天有哪些表演可以看？"),
    },
    Agent {
        id: "service",
        name: "服务助手",
        role: "Service Assistant",
        kind: AgentKind::Guide,
        description: "便民设施指引",
        default_prompt: Some("请问最近的洗手间在哪里？"),
    },
    Agent {
        id: "photo",
        name: "旅拍助手",
        role: "Photo Assistant",
        kind: AgentKind::Local,
        description: "最佳打卡点",
        default_prompt: Some("推荐几个适合拍照好看的地方。"),
    },
    Agent {
        id: "local",
        name: "周边玩家",
        role: "Local Explorer",
        kind: AgentKind::Local,
        description: "吃喝玩乐推荐",
        default_prompt: Some("周边有什么好吃的特色菜？"),
    },
];

static HERO_CARDS: [HeroCard; 6] = [
    HeroCard {
        id: "guide",
        name: "云小途",
        tagline: "路线活地图",
        style: CardStyle::Efficient,
        actions: [
            CardAction {
                label: "查看热力图",
                prompt: "请显示当前景区的游客热力图分布。",
            },
            CardAction {
                label: "避堵路线",
                prompt: "帮我规划一条避开拥堵的游览路线。",
            },
        ],
        tags: [
            ScoredTag { label: "精准度", score: 98 },
            ScoredTag { label: "响应快", score: 95 },
            ScoredTag { label: "全覆盖", score: 99 },
        ],
        description: "我是您的专属引路人。无论您身在何处，只要告诉我目的地，我都能为您规划出最省时、最便捷的路线。",
        info: UsefulInfo {
            color: InfoColor::Green,
            title: "当前拥挤度",
            subtitle: "舒适 · 宜游览",
            emoji: "🍃",
        },
    },
    HeroCard {
        id: "story",
        name: "墨渊",
        tagline: "古今通晓",
        style: CardStyle::Friendly,
        actions: [
            CardAction {
                label: "讲个趣闻",
                prompt: "给我讲一个关于这里的有趣历史传说。",
            },
            CardAction {
                label: "历史问答",
                prompt: "考考我关于这里的历史知识吧。",
            },
        ],
        tags: [
            ScoredTag { label: "博学值", score: 99 },
            ScoredTag { label: "故事力", score: 96 },
            ScoredTag { label: "沉浸感", score: 92 },
        ],
        description: "我是这里的说书人。每一块青石板，每一座老宅院，都有它尘封的往事。让我为您娓娓道来。",
        info: UsefulInfo {
            color: InfoColor::Blue,
            title: "当前位置",
            subtitle: "云峰博物馆附近",
            emoji: "📍",
        },
    },
    HeroCard {
        id: "event",
        name: "活力小七",
        tagline: "快乐制造机",
        style: CardStyle::Enthusiastic,
        actions: [
            CardAction {
                label: "今日演出",
                prompt: "今天有哪些不容错过的演出表演？",
            },
            CardAction {
                label: "预约活动",
                prompt: "我想预约参加晚上的篝火晚会。",
            },
        ],
        tags: [
            ScoredTag { label: "活力值", score: 98 },
            ScoredTag { label: "气氛组", score: 95 },
            ScoredTag { label: "资讯通", score: 94 },
        ],
        description: "我是活动助手！哪里热闹哪里就有我。想看地戏表演？想参加篝火晚会？跟着我，精彩不断！",
        info: UsefulInfo {
            color: InfoColor::Purple,
            title: "正在热映",
            subtitle: "非遗地戏表演 (主舞台)",
            emoji: "🎭",
        },
    },
    HeroCard {
        id: "service",
        name: "暖暖",
        tagline: "贴心小棉袄",
        style: CardStyle::Friendly,
        actions: [
            CardAction {
                label: "找洗手间",
                prompt: "请告诉我现在离我最近的洗手间在哪里？",
            },
            CardAction {
                label: "紧急呼叫",
                prompt: "我需要紧急帮助，请联系工作人员。",
            },
        ],
        tags: [
            ScoredTag { label: "亲和力", score: 99 },
            ScoredTag { label: "细心度", score: 97 },
            ScoredTag { label: "服务值", score: 96 },
        ],
        description: "我是服务助手。找厕所、找停车场、借轮椅……这些琐碎小事都交给我，让您的游玩体验无忧无虑。",
        info: UsefulInfo {
            color: InfoColor::Yellow,
            title: "最近设施",
            subtitle: "洗手间 (50m) · 停车场 (200m)",
            emoji: "🚻",
        },
    },
    HeroCard {
        id: "photo",
        name: "雅雅",
        tagline: "审美天花板",
        style: CardStyle::Efficient,
        actions: [
            CardAction {
                label: "推荐机位",
                prompt: "推荐几个现在光线最好的拍照机位。",
            },
            CardAction {
                label: "拍照指导",
                prompt: "教我几个适合这里的拍照姿势。",
            },
        ],
        tags: [
            ScoredTag { label: "审美力", score: 98 },
            ScoredTag { label: "出片率", score: 96 },
            ScoredTag { label: "构图感", score: 95 },
        ],
        description: "我是旅拍助手。不知道怎么摆pose？找不到最佳机位？让我带您去那些隐秘的绝美角落。",
        info: UsefulInfo {
            color: InfoColor::Blue,
            title: "最佳机位",
            subtitle: "云山屯古戏台 (距您120m)",
            emoji: "📸",
        },
    },
    HeroCard {
        id: "local",
        name: "阿福",
        tagline: "地道老饕",
        style: CardStyle::Enthusiastic,
        actions: [
            CardAction {
                label: "特色美食",
                prompt: "推荐几道必吃的本地特色菜。",
            },
            CardAction {
                label: "避雷指南",
                prompt: "有哪些网红店是不推荐去的？",
            },
        ],
        tags: [
            ScoredTag { label: "寻味力", score: 99 },
            ScoredTag { label: "本地通", score: 95 },
            ScoredTag { label: "性价比", score: 92 },
        ],
        description: "我是周边玩家。我知道巷子深处阿婆做的辣子鸡，还有村口那家最正宗的烤小肠。",
        info: UsefulInfo {
            color: InfoColor::Red,
            title: "饭点提醒",
            subtitle: "周边3家好评餐厅排队少",
            emoji: "🍜",
        },
    },
];

static OUTSIDE_CHIPS: [Chip; 4] = [
    Chip { label: "购门票", icon: "ticket" },
    Chip { label: "怎么去", icon: "bus" },
    Chip { label: "看攻略", icon: "map" },
    Chip { label: "全部服务", icon: "grid" },
];

static INSIDE_CHIPS: [Chip; 4] = [
    Chip { label: "找厕所", icon: "map-pin" },
    Chip { label: "听讲解", icon: "headphones" },
    Chip { label: "找美食", icon: "utensils" },
    Chip { label: "全部服务", icon: "grid" },
];

static SERVICES: [ServiceCategory; 3] = [
    ServiceCategory {
        title: "游前准备",
        items: &[
            ServiceItem { name: "预约购票", icon: "ticket" },
            ServiceItem { name: "交通指南", icon: "bus" },
            ServiceItem { name: "景区介绍", icon: "info" },
            ServiceItem { name: "游玩攻略", icon: "map" },
        ],
    },
    ServiceCategory {
        title: "游中服务",
        items: &[
            ServiceItem { name: "语音讲解", icon: "headphones" },
            ServiceItem { name: "智慧厕所", icon: "map-pin" },
            ServiceItem { name: "智慧停车", icon: "car" },
            ServiceItem { name: "紧急求助", icon: "phone" },
            ServiceItem { name: "文创商店", icon: "shopping-bag" },
            ServiceItem { name: "餐饮推荐", icon: "coffee" },
        ],
    },
    ServiceCategory {
        title: "游后互动",
        items: &[
            ServiceItem { name: "投诉建议", icon: "message-square" },
            ServiceItem { name: "精彩瞬间", icon: "image" },
            ServiceItem { name: "满意度评价", icon: "star" },
        ],
    },
];

/// Read-only view over the registries.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    agents: &'static [Agent],
    hero_cards: &'static [HeroCard],
    outside_chips: &'static [Chip],
    inside_chips: &'static [Chip],
    services: &'static [ServiceCategory],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            agents: &AGENTS,
            hero_cards: &HERO_CARDS,
            outside_chips: &OUTSIDE_CHIPS,
            inside_chips: &INSIDE_CHIPS,
            services: &SERVICES,
        }
    }

    pub fn agents(&self) -> &'static [Agent] {
        self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&'static Agent> {
        self.agents.get(index)
    }

    pub fn agent_index(&self, id: &str) -> Option<usize> {
        self.agents.iter().position(|agent| agent.id == id)
    }

    pub fn hero_cards(&self) -> &'static [HeroCard] {
        self.hero_cards
    }

    pub fn hero_for(&self, agent_id: &str) -> Option<&'static HeroCard> {
        self.hero_cards.iter().find(|card| card.id == agent_id)
    }

    pub fn chips(&self, inside_scenic: bool) -> &'static [Chip] {
        if inside_scenic {
            self.inside_chips
        } else {
            self.outside_chips
        }
    }

    pub fn services(&self) -> &'static [ServiceCategory] {
        self.services
    }

    /// Both synchronized lists render one item per agent, in the same order.
    pub fn is_consistent(&self) -> bool {
        self.agents.len() == self.hero_cards.len()
            && self
                .agents
                .iter()
                .zip(self.hero_cards)
                .all(|(agent, card)| agent.id == card.id)
    }
}
